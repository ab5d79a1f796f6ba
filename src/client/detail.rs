// src/client/detail.rs
//
// Página de detalhe do recibo. Com `download=true` o PDF é exportado logo
// depois da busca, sem outra ação do usuário.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    models::record::ReceiptRecord,
    render::{
        LayoutOptions, PdfRenderer, RenderError, ScreenView, build_layout, pdf_file_name, qr,
    },
};

use super::{
    api::{ClientError, ReceiptsApi},
    routes::Route,
};

// =============================================================================
//  EXPORTAÇÃO
// =============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Falha ao gravar o PDF: {0}")]
    Io(#[from] io::Error),

    #[error("Nenhum recibo carregado")]
    NothingLoaded,
}

/// Destino do "Download PDF".
pub trait ReceiptExporter: Send + Sync {
    fn export(&self, record: &ReceiptRecord) -> Result<PathBuf, ExportError>;
}

/// Grava `receipt_<número>.pdf` numa pasta.
#[derive(Debug, Clone)]
pub struct FileExporter {
    out_dir: PathBuf,
    renderer: PdfRenderer,
    options: LayoutOptions,
}

impl FileExporter {
    pub fn new(out_dir: impl Into<PathBuf>, renderer: PdfRenderer, options: LayoutOptions) -> Self {
        Self {
            out_dir: out_dir.into(),
            renderer,
            options,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ReceiptExporter for FileExporter {
    fn export(&self, record: &ReceiptRecord) -> Result<PathBuf, ExportError> {
        let layout = build_layout(record, &self.options);
        let bytes = self.renderer.render(&layout)?;
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(&layout.file_name);
        fs::write(&path, bytes)?;
        info!(file = %path.display(), "📄 PDF exportado");
        Ok(path)
    }
}

// =============================================================================
//  ESTADO DA PÁGINA
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(ReceiptRecord),
    /// Id desconhecido: a página mostra o link de volta para o histórico.
    NotFound,
    Failed(String),
}

#[derive(Debug)]
pub struct ReceiptDetail {
    origin: String,
    state: DetailState,
    exported: Option<PathBuf>,
    export_error: Option<String>,
}

impl ReceiptDetail {
    /// `origin` é a base pública usada no QR Code.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            state: DetailState::Loading,
            exported: None,
            export_error: None,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn record(&self) -> Option<&ReceiptRecord> {
        match &self.state {
            DetailState::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn screen(&self) -> Option<ScreenView> {
        self.record().map(ScreenView::from_record)
    }

    pub fn qr_url(&self) -> Option<String> {
        self.record().map(|r| qr::download_url(&self.origin, &r.id()))
    }

    pub fn file_name(&self) -> Option<String> {
        self.record().map(|r| pdf_file_name(&r.receipt_number()))
    }

    pub fn exported(&self) -> Option<&Path> {
        self.exported.as_deref()
    }

    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }

    /// Link de volta quando o recibo não existe.
    pub fn back_link(&self) -> Option<Route> {
        matches!(self.state, DetailState::NotFound).then_some(Route::History)
    }

    /// Busca o recibo e, se `download`, exporta em seguida.
    pub async fn open(
        &mut self,
        api: &dyn ReceiptsApi,
        id: &str,
        download: bool,
        exporter: &dyn ReceiptExporter,
    ) -> &DetailState {
        self.exported = None;
        self.export_error = None;

        self.state = match api.get_receipt(id).await {
            Ok(record) => DetailState::Loaded(record),
            Err(ClientError::NotFound) => {
                warn!(receipt_id = %id, "⚠️ Recibo não encontrado");
                DetailState::NotFound
            }
            Err(e) => {
                error!(receipt_id = %id, "🔥 Falha ao carregar o recibo: {}", e);
                DetailState::Failed(e.user_message())
            }
        };

        if download && self.record().is_some() {
            // Falha de exportação fica em `export_error`; a página continua carregada.
            let _ = self.download(exporter);
        }
        &self.state
    }

    /// Abre a partir de uma rota `/receipt/<id>`.
    pub async fn open_route(
        &mut self,
        api: &dyn ReceiptsApi,
        route: &Route,
        exporter: &dyn ReceiptExporter,
    ) -> Option<&DetailState> {
        match route {
            Route::Receipt { id, download } => Some(self.open(api, id, *download, exporter).await),
            _ => None,
        }
    }

    /// Ação "Download PDF".
    pub fn download(&mut self, exporter: &dyn ReceiptExporter) -> Result<PathBuf, ExportError> {
        let record = self.record().cloned().ok_or(ExportError::NothingLoaded)?;

        match exporter.export(&record) {
            Ok(path) => {
                self.exported = Some(path.clone());
                self.export_error = None;
                Ok(path)
            }
            Err(e) => {
                error!(receipt_id = %record.id(), "🔥 Falha ao exportar o PDF: {}", e);
                self.export_error = Some("Could not generate the PDF. Please try again.".to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading_without_qr() {
        let detail = ReceiptDetail::new("http://localhost:8080");
        assert_eq!(detail.state(), &DetailState::Loading);
        assert_eq!(detail.qr_url(), None);
        assert_eq!(detail.back_link(), None);
    }
}
