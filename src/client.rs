// src/client.rs
//
// Lado cliente do sistema: SDK tipado para a API REST e o estado das telas
// (formulário, histórico, detalhe, referências). Nada aqui desenha
// interface; uma UI só liga estes estados aos seus widgets.

pub mod api;
pub mod detail;
pub mod form;
pub mod history;
pub mod references;
pub mod routes;
pub mod storage;
pub mod validation;

pub use api::{ApiClient, ApiConfig, ClientError, ReceiptListing, ReceiptsApi};
pub use detail::{DetailState, FileExporter, ReceiptDetail, ReceiptExporter};
pub use form::{ActivityDetails, ActivityDraft, ReceiptDraft, ReceiptForm};
pub use history::HistoryView;
pub use references::{ReferenceManager, ReferenceProvider};
pub use routes::Route;
pub use storage::LastReceiptStore;
pub use validation::{FormErrors, validate};
