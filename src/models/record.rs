// src/models/record.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{
    fields::{self, Field},
    rules,
};

use super::receipt::{ActivityType, ReceiptWithActivities};

/// Recibo canônico como o cliente o enxerga.
///
/// Guarda o JSON cru: as chaves podem vir em camelCase ou snake_case, e toda
/// leitura passa pelo normalizador de campos. Nunca é alterado no lugar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptRecord(Value);

impl ReceiptRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_stored(stored: &ReceiptWithActivities) -> Result<Self, serde_json::Error> {
        serde_json::to_value(stored).map(Self)
    }

    pub fn get(&self, field: Field) -> &Value {
        fields::get(Some(&self.0), field)
    }

    pub fn text(&self, field: Field) -> String {
        fields::text(Some(&self.0), field)
    }

    pub fn id(&self) -> String {
        self.text(Field::Id)
    }

    pub fn receipt_number(&self) -> String {
        self.text(Field::ReceiptNumber)
    }

    pub fn activities(&self) -> Vec<ActivityRecord<'_>> {
        match self.get(Field::Activities) {
            Value::Array(items) => items.iter().map(ActivityRecord).collect(),
            _ => Vec::new(),
        }
    }

    /// Soma das atividades (valor ilegível conta como zero).
    pub fn total(&self) -> Decimal {
        rules::sum_amounts(self.activities().iter().map(ActivityRecord::amount))
    }
}

/// Visão de leitura de uma atividade dentro de um `ReceiptRecord`.
#[derive(Debug, Clone, Copy)]
pub struct ActivityRecord<'a>(&'a Value);

impl<'a> ActivityRecord<'a> {
    pub fn get(&self, field: Field) -> &'a Value {
        fields::get(Some(self.0), field)
    }

    pub fn text(&self, field: Field) -> String {
        fields::text(Some(self.0), field)
    }

    /// Texto aparado, `None` se vazio.
    pub fn present(&self, field: Field) -> Option<String> {
        let value = self.text(field);
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn raw_type(&self) -> String {
        self.text(Field::Type)
    }

    pub fn activity_type(&self) -> Option<ActivityType> {
        self.raw_type().parse().ok()
    }

    pub fn amount(&self) -> Decimal {
        rules::parse_amount(&self.text(Field::Amount)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_both_conventions_and_sums_activities() {
        let record = ReceiptRecord::new(json!({
            "id": "r-1",
            "receipt_number": "M00007",
            "activities": [
                { "activity_type": "car_rental", "amount": "100.25" },
                { "type": "hotel", "amount": 20 },
                { "type": "other", "amount": "oops" }
            ]
        }));

        assert_eq!(record.receipt_number(), "M00007");
        let activities = record.activities();
        assert_eq!(activities.len(), 3);
        assert_eq!(activities[0].activity_type(), Some(ActivityType::CarRental));
        assert_eq!(record.total(), Decimal::new(12025, 2));
    }

    #[test]
    fn total_of_huge_amounts_saturates() {
        let record = ReceiptRecord::new(json!({
            "activities": [
                { "type": "hotel", "amount": "79228162514264337593543950335" },
                { "type": "other", "amount": "79228162514264337593543950335" }
            ]
        }));
        assert_eq!(record.total(), Decimal::MAX);
    }

    #[test]
    fn missing_activities_is_empty() {
        let record = ReceiptRecord::new(json!({ "id": 5 }));
        assert_eq!(record.id(), "5");
        assert!(record.activities().is_empty());
        assert_eq!(record.total(), Decimal::ZERO);
    }
}
