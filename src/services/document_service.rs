// src/services/document_service.rs

use tracing::info;

use crate::{
    common::error::AppError,
    models::{receipt::ReceiptWithActivities, record::ReceiptRecord},
    render::{LayoutOptions, PdfRenderer, ReceiptLayout, build_layout},
};

/// PDF pronto para download.
#[derive(Debug, Clone)]
pub struct ReceiptPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    renderer: PdfRenderer,
    options: LayoutOptions,
}

impl DocumentService {
    pub fn new(renderer: PdfRenderer, options: LayoutOptions) -> Self {
        Self {
            renderer,
            options,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub async fn render_stored(&self, stored: &ReceiptWithActivities) -> Result<ReceiptPdf, AppError> {
        let record = ReceiptRecord::from_stored(stored).map_err(anyhow::Error::from)?;
        let layout = build_layout(&record, &self.options);
        let file_name = layout.file_name.clone();

        let bytes = self.render_layout(layout).await?;
        info!(receipt_id = %stored.receipt.id, file = %file_name, size = bytes.len(), "📄 PDF gerado");
        Ok(ReceiptPdf { file_name, bytes })
    }

    // genpdf é síncrono e pesado: roda fora das threads do runtime.
    async fn render_layout(&self, layout: ReceiptLayout) -> Result<Vec<u8>, AppError> {
        let renderer = self.renderer.clone();
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&layout))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(bytes)
    }
}
