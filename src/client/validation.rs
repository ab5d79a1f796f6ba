// src/client/validation.rs

use std::collections::BTreeMap;

use crate::common::{
    dates,
    rules::{self, ErrorKey},
};

use super::form::{ActivityDetails, ReceiptDraft};

/// Erros do formulário por chave. Vazio = formulário válido.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<ErrorKey, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn remove(&mut self, key: ErrorKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Forma textual (`activityAmount0` -> mensagem), como a tela exibe.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.0.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    /// Descarta os erros da atividade removida e reindexa os seguintes.
    pub fn remove_activity(&mut self, index: usize) {
        let previous = std::mem::take(&mut self.0);
        for (key, message) in previous {
            match key.activity_index() {
                Some(i) if i == index => {}
                Some(i) if i > index => {
                    self.0.insert(key.with_index(i - 1), message);
                }
                _ => {
                    self.0.insert(key, message);
                }
            }
        }
    }
}

/// Valida um retrato do formulário. Função pura: cada regra é independente.
pub fn validate(draft: &ReceiptDraft) -> FormErrors {
    let mut errors = FormErrors::new();
    let client = &draft.client;

    // --- Cliente ---
    if rules::is_blank(&client.name) {
        errors.insert(ErrorKey::ClientName, rules::REQUIRED);
    }

    if rules::is_blank(&client.email) {
        errors.insert(ErrorKey::ClientEmail, rules::REQUIRED);
    } else if !rules::is_valid_email(&client.email) {
        errors.insert(ErrorKey::ClientEmail, rules::INVALID_EMAIL);
    }

    if rules::is_blank(&client.phone) {
        errors.insert(ErrorKey::ClientPhone, rules::REQUIRED);
    } else if !rules::is_valid_phone(&client.phone) {
        errors.insert(ErrorKey::ClientPhone, rules::INVALID_PHONE);
    }

    let receipt_date = dates::parse(&client.receipt_date);
    if rules::is_blank(&client.receipt_date) {
        errors.insert(ErrorKey::ReceiptDate, rules::REQUIRED);
    } else if receipt_date.is_none() {
        errors.insert(ErrorKey::ReceiptDate, rules::INVALID_DATE);
    }

    // --- Atividades ---
    if draft.activities.is_empty() {
        errors.insert(ErrorKey::Activities, rules::NO_ACTIVITIES);
    }

    for (index, activity) in draft.activities.iter().enumerate() {
        if let Err(problem) = rules::check_amount_text(&activity.amount) {
            errors.insert(ErrorKey::ActivityAmount(index), problem.message());
        }

        let check_in = parse_optional(&activity.check_in);
        let check_out = parse_optional(&activity.check_out);
        if check_in.is_err() {
            errors.insert(ErrorKey::ActivityCheckIn(index), rules::INVALID_DATE);
        }
        if check_out.is_err() {
            errors.insert(ErrorKey::ActivityCheckOut(index), rules::INVALID_DATE);
        }
        if let (Ok(check_in), Ok(check_out)) = (check_in, check_out) {
            for problem in rules::check_activity_dates(receipt_date, check_in, check_out) {
                errors.insert(problem.key(index), problem.message());
            }
        }

        if let ActivityDetails::CarRental {
            pickup_location,
            dropoff_location,
            description,
            ..
        } = &activity.details
        {
            for gap in rules::car_rental_gaps(pickup_location, dropoff_location, description) {
                errors.insert(gap.key(index), gap.message());
            }
        }
    }

    errors
}

// Vazio -> Ok(None); texto que não é data -> Err.
fn parse_optional(raw: &str) -> Result<Option<chrono::NaiveDateTime>, ()> {
    if rules::is_blank(raw) {
        return Ok(None);
    }
    dates::parse(raw).map(Some).ok_or(())
}
