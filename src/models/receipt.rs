// src/models/receipt.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::rules;

// --- ENUMS ---

// Mapeia o CREATE TYPE activity_type do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    Hotel,
    CarRental,
    Transfer,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Hotel,
        ActivityType::CarRental,
        ActivityType::Transfer,
        ActivityType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Hotel => "hotel",
            ActivityType::CarRental => "car_rental",
            ActivityType::Transfer => "transfer",
            ActivityType::Other => "other",
        }
    }

    /// Título de seção: `car_rental` -> `CAR RENTAL`.
    pub fn title(self) -> String {
        section_title(self.as_str())
    }
}

/// Título de seção para um tipo cru (o registro pode trazer tipos que não
/// conhecemos). Sem tipo, `ACTIVITY`.
pub fn section_title(raw_type: &str) -> String {
    let raw = raw_type.trim();
    if raw.is_empty() {
        return "ACTIVITY".to_string();
    }
    raw.replace('_', " ").to_uppercase()
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("tipo de atividade desconhecido: {s}"))
    }
}

// Mapeia o CREATE TYPE transfer_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transfer_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    AirportPickup,
    AirportDropoff,
    CityTransfer,
    HotelTransfer,
}

impl TransferType {
    pub const ALL: [TransferType; 4] = [
        TransferType::AirportPickup,
        TransferType::AirportDropoff,
        TransferType::CityTransfer,
        TransferType::HotelTransfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransferType::AirportPickup => "airport_pickup",
            TransferType::AirportDropoff => "airport_dropoff",
            TransferType::CityTransfer => "city_transfer",
            TransferType::HotelTransfer => "hotel_transfer",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransferType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("tipo de transfer desconhecido: {s}"))
    }
}

// --- NÚMERO DO RECIBO ---

/// `M` + sequência com 5 dígitos (`M00042`).
pub fn format_receipt_number(sequence: i64) -> String {
    format!("M{sequence:05}")
}

/// Parte numérica do número do recibo (remove o prefixo de um caractere).
pub fn receipt_number_suffix(receipt_number: &str) -> Option<i64> {
    let mut chars = receipt_number.trim().chars();
    chars.next()?;
    chars.as_str().parse().ok()
}

// --- LINHAS DO BANCO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "M00042")]
    pub receipt_number: String,
    #[schema(example = "Jane Doe")]
    pub client_name: String,
    #[schema(example = "jane@x.com")]
    pub client_email: String,
    #[schema(example = "+15551234567")]
    pub client_phone: String,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub receipt_date: NaiveDate,
    #[schema(example = "150.50")]
    pub amount_paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub receipt_id: Uuid,
    #[serde(skip)]
    #[schema(ignore)]
    pub position: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub property_name: Option<String>,
    pub property_address: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub check_in: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub check_out: Option<NaiveDate>,
    #[schema(example = "120.50")]
    pub amount: Decimal,
    pub car_model: Option<String>,
    pub car_plate: Option<String>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub transfer_type: Option<TransferType>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recibo como a API devolve: cabeçalho + atividades na ordem do formulário.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptWithActivities {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptListResponse {
    pub data: Vec<ReceiptWithActivities>,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub limit: i64,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceiptPayload {
    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "Jane Doe")]
    pub client_name: String,

    #[validate(custom(function = "rules::validate_email"))]
    #[schema(example = "jane@x.com")]
    pub client_email: String,

    #[validate(custom(function = "rules::validate_phone"))]
    #[schema(example = "+15551234567")]
    pub client_phone: String,

    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "2024-05-01")]
    pub receipt_date: String,

    // Ignorado pelo servidor: o total é sempre recalculado.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,

    #[validate(length(min = 1, message = "At least one activity is required"))]
    #[validate(nested)]
    pub activities: Vec<ActivityPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,

    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub property_address: Option<String>,

    #[serde(default)]
    #[schema(example = "2024-04-28")]
    pub check_in: Option<String>,
    #[serde(default)]
    #[schema(example = "2024-04-30")]
    pub check_out: Option<String>,

    #[validate(custom(function = "rules::validate_amount"))]
    #[schema(example = "120.50")]
    pub amount: Decimal,

    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub car_plate: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub dropoff_location: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub transfer_type: Option<TransferType>,

    #[serde(default)]
    pub description: Option<String>,
}

// O formulário manda "" quando nenhum tipo de transfer foi escolhido.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<TransferType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

// --- DADOS JÁ NORMALIZADOS (prontos para o INSERT) ---

#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub receipt_date: NaiveDate,
    pub amount_paid: Decimal,
    pub activities: Vec<NewActivity>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub property_name: Option<String>,
    pub property_address: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub amount: Decimal,
    pub car_model: Option<String>,
    pub car_plate: Option<String>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub transfer_type: Option<TransferType>,
    pub description: Option<String>,
}
