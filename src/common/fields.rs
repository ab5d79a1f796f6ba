// src/common/fields.rs

use serde_json::Value;

// Valor devolvido quando nenhuma grafia do campo tem conteúdo.
static EMPTY: Value = Value::String(String::new());

/// Campos lógicos de um recibo (e das suas atividades).
///
/// O backend já emitiu o mesmo campo em camelCase e em snake_case, dependendo
/// da versão. Toda leitura passa por aqui, nunca por acesso direto à chave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    ReceiptNumber,
    ClientName,
    ClientEmail,
    ClientPhone,
    ReceiptDate,
    AmountPaid,
    CreatedAt,
    Activities,
    // --- Atividade ---
    Type,
    PropertyName,
    PropertyAddress,
    CheckIn,
    CheckOut,
    Amount,
    CarModel,
    CarPlate,
    PickupLocation,
    DropoffLocation,
    TransferType,
    Description,
    // --- Envelope de paginação ---
    Data,
    Page,
    Limit,
    Total,
    TotalPages,
}

impl Field {
    /// Tabela única de grafias aceitas, na ordem de preferência.
    /// Nova grafia do backend = uma linha aqui.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["id", "ID"],
            Field::ReceiptNumber => &["receiptNumber", "receipt_number"],
            Field::ClientName => &["clientName", "client_name"],
            Field::ClientEmail => &["clientEmail", "client_email"],
            Field::ClientPhone => &["clientPhone", "client_phone"],
            Field::ReceiptDate => &["receiptDate", "receipt_date"],
            Field::AmountPaid => &["amountPaid", "amount_paid"],
            Field::CreatedAt => &["createdAt", "created_at"],
            Field::Activities => &["activities", "Activities"],
            Field::Type => &["type", "activityType", "activity_type"],
            Field::PropertyName => &["propertyName", "property_name"],
            Field::PropertyAddress => &["propertyAddress", "property_address"],
            Field::CheckIn => &["checkIn", "check_in"],
            Field::CheckOut => &["checkOut", "check_out"],
            Field::Amount => &["amount"],
            Field::CarModel => &["carModel", "car_model"],
            Field::CarPlate => &["carPlate", "car_plate"],
            Field::PickupLocation => &["pickupLocation", "pickup_location"],
            Field::DropoffLocation => &["dropoffLocation", "dropoff_location"],
            Field::TransferType => &["transferType", "transfer_type"],
            Field::Description => &["description"],
            Field::Data => &["data", "items"],
            Field::Page => &["page"],
            Field::Limit => &["limit"],
            Field::Total => &["total"],
            Field::TotalPages => &["totalPages", "total_pages"],
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Retorna o primeiro valor presente (não nulo, não string vazia) entre as
/// chaves informadas. Sem registro ou sem valor, retorna string vazia.
pub fn resolve<'a>(record: Option<&'a Value>, keys: &[&str]) -> &'a Value {
    let Some(Value::Object(map)) = record else {
        return &EMPTY;
    };

    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_present(value))
        .unwrap_or(&EMPTY)
}

/// Resolve um nome lógico tentando: como veio, camelCase, snake_case.
pub fn resolve_key<'a>(record: Option<&'a Value>, logical_key: &str) -> &'a Value {
    let camel = to_camel_case(logical_key);
    let snake = to_snake_case(logical_key);
    resolve(record, &[logical_key, camel.as_str(), snake.as_str()])
}

pub fn get(record: Option<&Value>, field: Field) -> &Value {
    resolve(record, field.keys())
}

/// Versão texto de `get`: números e booleanos viram string, objetos e
/// arrays viram vazio.
pub fn text(record: Option<&Value>, field: Field) -> String {
    value_to_text(get(record, field))
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
