// src/common/rules.rs
//
// Regras de validação compartilhadas entre o validador do formulário
// (client::validation) e o backend (models::receipt + services).

use std::{borrow::Cow, fmt, str::FromStr, sync::LazyLock};

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use validator::ValidationError;

// =============================================================================
//  MENSAGENS
// =============================================================================

pub const REQUIRED: &str = "This field is required";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Please enter a valid phone number (10-15 digits)";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
pub const AMOUNT_TOO_LARGE: &str = "Amount is too large (max $1,000,000)";
pub const CHECK_OUT_BEFORE_CHECK_IN: &str = "Check-out must be after check-in";
pub const CHECK_IN_AFTER_RECEIPT_DATE: &str = "Check-in date cannot be after invoice date";
pub const PICKUP_REQUIRED: &str = "Pickup location is required for car rental";
pub const DROPOFF_REQUIRED: &str = "Dropoff location is required for car rental";
pub const OPERATOR_COMMENTS_REQUIRED: &str = "Operator comments are required for car rental";
pub const INVALID_DATE: &str = "Please enter a valid date";
pub const NO_ACTIVITIES: &str = "At least one activity is required";

/// Teto de um valor de atividade.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_RE deve compilar")
});

pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("PHONE_RE deve compilar"));

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

// =============================================================================
//  CHAVES DE ERRO
// =============================================================================

/// Chave de um erro de formulário. A forma textual (`clientName`,
/// `activityAmount0`, ...) é a mesma no cliente e nos detalhes do backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    ClientName,
    ClientEmail,
    ClientPhone,
    ReceiptDate,
    Activities,
    General,
    ActivityAmount(usize),
    ActivityCheckIn(usize),
    ActivityCheckOut(usize),
    ActivityPickupLocation(usize),
    ActivityDropoffLocation(usize),
    ActivityDescription(usize),
}

impl ErrorKey {
    /// Índice da atividade, quando a chave é de atividade.
    pub fn activity_index(self) -> Option<usize> {
        match self {
            ErrorKey::ActivityAmount(i)
            | ErrorKey::ActivityCheckIn(i)
            | ErrorKey::ActivityCheckOut(i)
            | ErrorKey::ActivityPickupLocation(i)
            | ErrorKey::ActivityDropoffLocation(i)
            | ErrorKey::ActivityDescription(i) => Some(i),
            _ => None,
        }
    }

    /// Mesma chave apontando para outro índice (usado quando atividades são
    /// removidas e as seguintes sobem uma posição).
    pub fn with_index(self, index: usize) -> Self {
        match self {
            ErrorKey::ActivityAmount(_) => ErrorKey::ActivityAmount(index),
            ErrorKey::ActivityCheckIn(_) => ErrorKey::ActivityCheckIn(index),
            ErrorKey::ActivityCheckOut(_) => ErrorKey::ActivityCheckOut(index),
            ErrorKey::ActivityPickupLocation(_) => ErrorKey::ActivityPickupLocation(index),
            ErrorKey::ActivityDropoffLocation(_) => ErrorKey::ActivityDropoffLocation(index),
            ErrorKey::ActivityDescription(_) => ErrorKey::ActivityDescription(index),
            other => other,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::ClientName => f.write_str("clientName"),
            ErrorKey::ClientEmail => f.write_str("clientEmail"),
            ErrorKey::ClientPhone => f.write_str("clientPhone"),
            ErrorKey::ReceiptDate => f.write_str("receiptDate"),
            ErrorKey::Activities => f.write_str("activities"),
            ErrorKey::General => f.write_str("general"),
            ErrorKey::ActivityAmount(i) => write!(f, "activityAmount{i}"),
            ErrorKey::ActivityCheckIn(i) => write!(f, "activityCheckIn{i}"),
            ErrorKey::ActivityCheckOut(i) => write!(f, "activityCheckOut{i}"),
            ErrorKey::ActivityPickupLocation(i) => write!(f, "activityPickupLocation{i}"),
            ErrorKey::ActivityDropoffLocation(i) => write!(f, "activityDropoffLocation{i}"),
            ErrorKey::ActivityDescription(i) => write!(f, "activityDescription{i}"),
        }
    }
}

// =============================================================================
//  VALORES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountProblem {
    NotPositive,
    TooLarge,
}

impl AmountProblem {
    pub fn message(self) -> &'static str {
        match self {
            AmountProblem::NotPositive => AMOUNT_NOT_POSITIVE,
            AmountProblem::TooLarge => AMOUNT_TOO_LARGE,
        }
    }
}

/// Lê um valor digitado. Aceita decimal simples ou notação científica.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Decimal::from_f64)
    })
}

/// Soma de valores sem estourar: passa do teto do `Decimal`, fica no teto.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

pub fn check_amount(amount: Decimal) -> Result<Decimal, AmountProblem> {
    if amount <= Decimal::ZERO {
        Err(AmountProblem::NotPositive)
    } else if amount > MAX_AMOUNT {
        Err(AmountProblem::TooLarge)
    } else {
        Ok(amount)
    }
}

pub fn check_amount_text(raw: &str) -> Result<Decimal, AmountProblem> {
    parse_amount(raw)
        .ok_or(AmountProblem::NotPositive)
        .and_then(check_amount)
}

// =============================================================================
//  REGRAS ENTRE CAMPOS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateProblem {
    CheckOutBeforeCheckIn,
    CheckInAfterReceiptDate,
}

impl DateProblem {
    pub fn message(self) -> &'static str {
        match self {
            DateProblem::CheckOutBeforeCheckIn => CHECK_OUT_BEFORE_CHECK_IN,
            DateProblem::CheckInAfterReceiptDate => CHECK_IN_AFTER_RECEIPT_DATE,
        }
    }

    pub fn key(self, index: usize) -> ErrorKey {
        match self {
            DateProblem::CheckOutBeforeCheckIn => ErrorKey::ActivityCheckOut(index),
            DateProblem::CheckInAfterReceiptDate => ErrorKey::ActivityCheckIn(index),
        }
    }
}

/// Ordem das datas de uma atividade. Só compara o que estiver presente.
pub fn check_activity_dates(
    receipt_date: Option<NaiveDateTime>,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
) -> Vec<DateProblem> {
    let mut problems = Vec::new();
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_in > check_out {
            problems.push(DateProblem::CheckOutBeforeCheckIn);
        }
    }
    if let (Some(check_in), Some(receipt_date)) = (check_in, receipt_date) {
        if check_in > receipt_date {
            problems.push(DateProblem::CheckInAfterReceiptDate);
        }
    }
    problems
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarRentalGap {
    PickupLocation,
    DropoffLocation,
    OperatorComments,
}

impl CarRentalGap {
    pub fn message(self) -> &'static str {
        match self {
            CarRentalGap::PickupLocation => PICKUP_REQUIRED,
            CarRentalGap::DropoffLocation => DROPOFF_REQUIRED,
            CarRentalGap::OperatorComments => OPERATOR_COMMENTS_REQUIRED,
        }
    }

    pub fn key(self, index: usize) -> ErrorKey {
        match self {
            CarRentalGap::PickupLocation => ErrorKey::ActivityPickupLocation(index),
            CarRentalGap::DropoffLocation => ErrorKey::ActivityDropoffLocation(index),
            CarRentalGap::OperatorComments => ErrorKey::ActivityDescription(index),
        }
    }
}

/// Campos obrigatórios de um aluguel de carro que estão em branco.
pub fn car_rental_gaps(pickup: &str, dropoff: &str, description: &str) -> Vec<CarRentalGap> {
    [
        (pickup, CarRentalGap::PickupLocation),
        (dropoff, CarRentalGap::DropoffLocation),
        (description, CarRentalGap::OperatorComments),
    ]
    .into_iter()
    .filter(|(value, _)| is_blank(value))
    .map(|(_, gap)| gap)
    .collect()
}

// =============================================================================
//  FUNÇÕES PARA `#[validate(custom(...))]`
// =============================================================================

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(failure("required", REQUIRED));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !is_valid_email(value) {
        return Err(failure("email", INVALID_EMAIL));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !is_valid_phone(value) {
        return Err(failure("phone", INVALID_PHONE));
    }
    Ok(())
}

pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    match check_amount(*value) {
        Ok(_) => Ok(()),
        Err(AmountProblem::NotPositive) => Err(failure("amount_not_positive", AMOUNT_NOT_POSITIVE)),
        Err(AmountProblem::TooLarge) => Err(failure("amount_too_large", AMOUNT_TOO_LARGE)),
    }
}
