// src/models/reference.rs
//
// Catálogos usados para preencher atividades (hotéis e locadoras).
// `NewHotel` / `NewCarRental` são o único contrato de criação: o handler do
// backend e a tela de gestão do cliente validam com as mesmas regras.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::rules;

/// Algo que pode preencher nome + endereço de uma atividade.
pub trait ReferenceEntity {
    fn name(&self) -> &str;
    fn address(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: Uuid,
    #[schema(example = "Hyatt Regency Tashkent")]
    pub name: String,
    #[schema(example = "Navoi Street 1A")]
    pub address: String,
    #[schema(example = "Tashkent")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRental {
    pub id: Uuid,
    #[schema(example = "Avis Uzbekistan")]
    pub name: String,
    #[schema(example = "Amir Temur Avenue 15")]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReferenceEntity for Hotel {
    fn name(&self) -> &str {
        &self.name
    }
    fn address(&self) -> &str {
        &self.address
    }
}

impl ReferenceEntity for CarRental {
    fn name(&self) -> &str {
        &self.name
    }
    fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "Hilton Tashkent City")]
    pub name: String,

    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "Amir Temur Square 107/B")]
    pub address: String,

    #[serde(default)]
    #[schema(example = "Tashkent")]
    pub city: Option<String>,
}

impl NewHotel {
    /// Versão aparada; cidade em branco vira `None`.
    pub fn normalized(&self) -> NewHotel {
        NewHotel {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self
                .city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCarRental {
    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "Avis Uzbekistan")]
    pub name: String,

    #[validate(custom(function = "rules::validate_required"))]
    #[schema(example = "Amir Temur Avenue 15")]
    pub address: String,
}

impl NewCarRental {
    pub fn normalized(&self) -> NewCarRental {
        NewCarRental {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HotelQuery {
    /// Filtro de cidade (sem diferenciar maiúsculas)
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_address_are_required_city_is_not() {
        let hotel = NewHotel { name: "  ".into(), address: "Navoi 1".into(), city: None };
        let errors = hotel.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(!errors.field_errors().contains_key("city"));

        let hotel = NewHotel { name: "Hyatt".into(), address: "Navoi 1".into(), city: None };
        assert!(hotel.validate().is_ok());
    }

    #[test]
    fn normalization_trims_and_drops_blank_city() {
        let hotel = NewHotel { name: " Hyatt ".into(), address: " Navoi 1 ".into(), city: Some(" ".into()) };
        assert_eq!(
            hotel.normalized(),
            NewHotel { name: "Hyatt".into(), address: "Navoi 1".into(), city: None }
        );
    }
}
