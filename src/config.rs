// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{ReceiptRepository, ReferenceRepository},
    render::{LayoutOptions, PdfRenderer},
    services::{DocumentService, ReceiptService, ReferenceService, SeedService},
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_FONTS_DIR: &str = "./fonts";
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";
pub const DEFAULT_PAYMENT_METHOD: &str = "Uzum Bank";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    /// Origem pública usada na URL do QR Code.
    pub public_origin: String,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub logo_path: Option<PathBuf>,
    pub payment_method: String,
    pub seed_reference_data: bool,
    pub cors_allow_origin: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let seed_reference_data = match var("SEED_REFERENCE_DATA") {
            None => false,
            Some(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("SEED_REFERENCE_DATA inválido: {raw}"))?,
        };

        Ok(Self {
            database_url,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            public_origin: var("PUBLIC_ORIGIN").unwrap_or_else(|| DEFAULT_PUBLIC_ORIGIN.to_string()),
            fonts_dir: var("FONTS_DIR").unwrap_or_else(|| DEFAULT_FONTS_DIR.to_string()).into(),
            font_family: var("FONT_FAMILY").unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            logo_path: var("LOGO_PATH").map(PathBuf::from),
            payment_method: var("PAYMENT_METHOD").unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            seed_reference_data,
            cors_allow_origin: var("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".to_string()),
        })
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::new(self.public_origin.clone(), self.payment_method.clone())
    }

    pub fn pdf_renderer(&self) -> PdfRenderer {
        PdfRenderer::new(self.fonts_dir.clone(), self.font_family.clone()).with_logo(self.logo_path.clone())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub receipt_service: ReceiptService,
    pub reference_service: ReferenceService,
    pub document_service: DocumentService,
    pub seed_service: SeedService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, settings))
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn with_pool(db_pool: PgPool, settings: Settings) -> Self {
        let receipt_service = ReceiptService::new(ReceiptRepository::new());
        let reference_service = ReferenceService::new(ReferenceRepository::new());
        let seed_service = SeedService::new(ReferenceRepository::new());
        let document_service = DocumentService::new(settings.pdf_renderer(), settings.layout_options());

        Self {
            db_pool,
            settings,
            receipt_service,
            reference_service,
            document_service,
            seed_service,
        }
    }
}
