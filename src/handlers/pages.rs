// src/handlers/pages.rs
//
// Página de detalhe do recibo (HTML). É o destino do QR Code: com
// `?download=true` a resposta já é o PDF como anexo.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    common::error::AppError,
    config::AppState,
    models::record::ReceiptRecord,
    render::{ScreenView, qr},
};

#[derive(Template)]
#[template(path = "receipt.html")]
pub struct ReceiptPage {
    pub view: ScreenView,
    pub qr_url: String,
    pub download_url: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub receipt_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub download: Option<String>,
}

impl DetailQuery {
    pub fn wants_download(&self) -> bool {
        self.download.as_deref().map(str::trim) == Some("true")
    }
}

// GET /receipt/{id}
pub async fn receipt_page(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, AppError> {
    let stored = match app_state.receipt_service.get(&app_state.db_pool, &id).await {
        Ok(stored) => stored,
        Err(AppError::ReceiptNotFound) => {
            warn!(receipt_id = %id, "⚠️ Página de recibo inexistente");
            let page = NotFoundPage { receipt_id: id };
            return Ok((StatusCode::NOT_FOUND, Html(page.render()?)).into_response());
        }
        Err(e) => return Err(e),
    };

    if query.wants_download() {
        let pdf = app_state.document_service.render_stored(&stored).await?;

        // Headers para o navegador baixar o PDF
        let disposition = format!("attachment; filename=\"{}\"", pdf.file_name);
        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ];
        return Ok((headers, pdf.bytes).into_response());
    }

    let record = ReceiptRecord::from_stored(&stored).map_err(anyhow::Error::from)?;
    let origin = &app_state.document_service.options().public_origin;
    let page = ReceiptPage {
        view: ScreenView::from_record(&record),
        qr_url: qr::download_url(origin, &record.id()),
        download_url: format!("/receipt/{}?download=true", record.id()),
    };
    Ok(Html(page.render()?).into_response())
}
