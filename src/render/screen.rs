// src/render/screen.rs

use serde::Serialize;

use crate::{
    common::{dates, fields::Field},
    models::{
        receipt::{ActivityType, section_title},
        record::{ActivityRecord, ReceiptRecord},
    },
};

use super::format_money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenSection {
    pub title: String,
    pub rows: Vec<ScreenRow>,
    pub amount: String,
}

/// Detalhe completo do recibo, pronto para o template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenView {
    pub id: String,
    pub receipt_number: String,
    pub display_date: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub sections: Vec<ScreenSection>,
    pub total: String,
}

impl ScreenView {
    pub fn from_record(record: &ReceiptRecord) -> Self {
        Self {
            id: record.id(),
            receipt_number: record.receipt_number(),
            display_date: dates::format_display_date(&record.text(Field::ReceiptDate)),
            client_name: record.text(Field::ClientName),
            client_email: record.text(Field::ClientEmail),
            client_phone: record.text(Field::ClientPhone),
            sections: record.activities().iter().map(screen_section).collect(),
            total: format_money(record.total()),
        }
    }
}

/// Título da seção de uma atividade. Sem tipo, tenta adivinhar hotel pelo nome.
pub fn activity_title(activity: &ActivityRecord<'_>) -> String {
    let raw = activity.raw_type();
    if raw.trim().is_empty()
        && activity
            .text(Field::PropertyName)
            .to_lowercase()
            .contains("hotel")
    {
        return ActivityType::Hotel.title();
    }
    section_title(&raw)
}

fn screen_section(activity: &ActivityRecord<'_>) -> ScreenSection {
    let is_car_rental = activity.activity_type() == Some(ActivityType::CarRental);
    let mut rows = Vec::new();
    let mut push = |label: &'static str, value: Option<String>| {
        if let Some(value) = value {
            rows.push(ScreenRow { label, value });
        }
    };

    push("Property", activity.present(Field::PropertyName));
    push("Address", activity.present(Field::PropertyAddress));
    push(
        "Check-In",
        activity.present(Field::CheckIn).map(|d| dates::format_display_date(&d)),
    );
    push(
        "Check-Out",
        activity.present(Field::CheckOut).map(|d| dates::format_display_date(&d)),
    );
    if is_car_rental {
        push("Operator Comments", activity.present(Field::Description));
    }
    push("Locations", locations(activity));
    push("Transfer Type", activity.present(Field::TransferType));
    if !is_car_rental {
        push("Description", activity.present(Field::Description));
    }

    ScreenSection {
        title: activity_title(activity),
        rows,
        amount: format_money(activity.amount()),
    }
}

fn locations(activity: &ActivityRecord<'_>) -> Option<String> {
    let parts: Vec<String> = [
        activity.present(Field::PickupLocation).map(|p| format!("Pickup: {p}")),
        activity.present(Field::DropoffLocation).map(|d| format!("Dropoff: {d}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Versão compacta exibida logo após gerar o recibo; leva ao detalhe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub receipt_number: String,
    pub display_date: String,
    pub client_name: String,
    pub lines: Vec<String>,
    pub total: String,
    pub detail_path: String,
}

impl PreviewView {
    pub fn from_record(record: &ReceiptRecord) -> Self {
        let lines = record
            .activities()
            .iter()
            .map(|activity| {
                let subject = activity
                    .present(Field::PropertyName)
                    .or_else(|| locations(activity))
                    .or_else(|| activity.present(Field::Description));
                match subject {
                    Some(subject) => format!(
                        "{} - {} - {}",
                        activity_title(activity),
                        subject,
                        format_money(activity.amount())
                    ),
                    None => format!("{} - {}", activity_title(activity), format_money(activity.amount())),
                }
            })
            .collect();

        Self {
            receipt_number: record.receipt_number(),
            display_date: dates::format_display_date(&record.text(Field::ReceiptDate)),
            client_name: record.text(Field::ClientName),
            lines,
            total: format_money(record.total()),
            detail_path: format!("/receipt/{}", record.id()),
        }
    }
}
