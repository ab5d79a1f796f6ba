// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::render::RenderError;

/// Detalhes por campo devolvidos junto com um 400.
pub type FieldDetails = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Regras entre campos (datas, aluguel de carro). Chaves no formato do formulário.
    #[error("Dados inconsistentes")]
    InconsistentPayload(FieldDetails),

    #[error("Data inválida no campo {0}")]
    InvalidDate(String),

    #[error("Busca sem termo")]
    EmptySearchQuery,

    #[error("Recibo não encontrado")]
    ReceiptNotFound,

    #[error("Hotel não encontrado")]
    HotelNotFound,

    #[error("Locadora não encontrada")]
    CarRentalNotFound,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao gerar o documento: {0}")]
    RenderError(#[from] RenderError),

    #[error("Erro de template: {0}")]
    TemplateError(#[from] askama::Error),

    // Qualquer outro erro inesperado; `anyhow` guarda o contexto.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Achata os erros do `validator` (inclusive listas aninhadas) em
/// `campo -> mensagens`, com caminhos como `activities[0].amount`.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> FieldDetails {
    let mut details = FieldDetails::new();
    collect(None, errors, &mut details);
    details
}

fn collect(prefix: Option<&str>, errors: &ValidationErrors, out: &mut FieldDetails) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect(Some(&path), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(Some(&format!("{path}[{index}]")), inner, out);
                }
            }
        }
    }
}

fn bad_request(message: &str, details: FieldDetails) -> Response {
    let body = Json(json!({
        "error": message,
        "details": details,
    }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let details = flatten_validation_errors(&errors);
                tracing::warn!(?details, "Payload rejeitado pela validação");
                return bad_request("One or more fields are invalid.", details);
            }
            AppError::InconsistentPayload(details) => {
                tracing::warn!(?details, "Payload com campos inconsistentes");
                return bad_request("One or more fields are invalid.", details);
            }
            AppError::InvalidDate(field) => {
                let body = Json(json!({ "error": format!("Invalid date for field {field}") }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmptySearchQuery => (StatusCode::BAD_REQUEST, "Search query is required"),
            AppError::ReceiptNotFound => (StatusCode::NOT_FOUND, "Receipt not found"),
            AppError::HotelNotFound => (StatusCode::NOT_FOUND, "Hotel not found"),
            AppError::CarRentalNotFound => (StatusCode::NOT_FOUND, "Car rental not found"),

            // Banco, render, template e erros internos viram 500 (e ficam no log).
            ref e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
