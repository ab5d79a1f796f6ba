// src/client/history.rs
//
// Tela de histórico: listagem paginada ou busca, conforme exista termo.

use std::cmp::Ordering;

use tracing::{debug, error};

use crate::{
    common::{dates, fields::Field},
    models::{receipt::receipt_number_suffix, record::ReceiptRecord},
    render::format_money,
};

use super::api::{ClientError, ReceiptListing, ReceiptsApi};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pedido emitido pela tela. O `ticket` identifica a resposta esperada:
/// respostas de pedidos anteriores são descartadas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub ticket: u64,
    pub query: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl HistoryRequest {
    pub async fn send(&self, api: &dyn ReceiptsApi) -> Result<ReceiptListing, ClientError> {
        match &self.query {
            Some(query) => api.search_receipts(query, self.page, self.limit).await,
            None => api.list_receipts(self.page, self.limit).await,
        }
    }
}

/// Linha da tabela de histórico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub receipt_number: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub date: String,
    pub amount: String,
    pub activity_count: usize,
}

impl HistoryRow {
    fn from_record(record: &ReceiptRecord) -> Self {
        Self {
            id: record.id(),
            receipt_number: record.receipt_number(),
            client_name: record.text(Field::ClientName),
            client_email: record.text(Field::ClientEmail),
            client_phone: record.text(Field::ClientPhone),
            date: dates::format_display_date(&record.text(Field::ReceiptDate)),
            amount: format_money(record.total()),
            activity_count: record.activities().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub pages: Vec<u32>,
}

#[derive(Debug)]
pub struct HistoryView {
    query: String,
    limit: u32,
    listing: Option<ReceiptListing>,
    unfiltered: Option<ReceiptListing>,
    last_ticket: u64,
    pending: Option<u64>,
    error: Option<String>,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl HistoryView {
    pub fn new(limit: u32) -> Self {
        Self {
            query: String::new(),
            limit: limit.max(1),
            listing: None,
            unfiltered: None,
            last_ticket: 0,
            pending: None,
            error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn listing(&self) -> Option<&ReceiptListing> {
        self.listing.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Termo efetivo: `None` quando em branco.
    fn active_query(&self) -> Option<String> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    // --- Ciclo de pedido / resposta ---

    /// Monta o pedido da página `page` (busca se houver termo, senão listagem).
    pub fn request(&mut self, page: u32) -> HistoryRequest {
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        HistoryRequest {
            ticket: self.last_ticket,
            query: self.active_query(),
            page: page.max(1),
            limit: self.limit,
        }
    }

    /// Aplica uma resposta. Devolve `false` se ela for de um pedido antigo.
    pub fn apply(&mut self, request: &HistoryRequest, outcome: Result<ReceiptListing, ClientError>) -> bool {
        if request.ticket != self.last_ticket {
            debug!(ticket = request.ticket, latest = self.last_ticket, "descartando resposta antiga");
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(mut listing) => {
                sort_by_number(&mut listing.items);
                if request.query.is_none() {
                    self.unfiltered = Some(listing.clone());
                }
                self.listing = Some(listing);
                self.error = None;
            }
            Err(e) => {
                error!("🔥 Falha ao carregar o histórico: {}", e);
                self.error = Some(e.user_message());
            }
        }
        true
    }

    pub async fn load(&mut self, api: &dyn ReceiptsApi, page: u32) {
        let request = self.request(page);
        let outcome = request.send(api).await;
        self.apply(&request, outcome);
    }

    pub async fn search(&mut self, api: &dyn ReceiptsApi, query: impl Into<String>) {
        self.set_query(query);
        if self.active_query().is_none() {
            self.clear_search(api).await;
        } else {
            self.load(api, 1).await;
        }
    }

    /// Limpa o termo. Se já existe uma listagem sem filtro em memória, ela
    /// volta sem nova requisição.
    pub async fn clear_search(&mut self, api: &dyn ReceiptsApi) {
        self.query.clear();
        if !self.restore_unfiltered() {
            self.load(api, 1).await;
        }
    }

    /// Volta para a última listagem sem filtro, se houver. Invalida
    /// qualquer pedido ainda em andamento.
    pub fn restore_unfiltered(&mut self) -> bool {
        match &self.unfiltered {
            Some(listing) => {
                self.last_ticket += 1;
                self.pending = None;
                self.listing = Some(listing.clone());
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub async fn go_to_page(&mut self, api: &dyn ReceiptsApi, page: u32) {
        let total_pages = self.listing.as_ref().map_or(0, |l| l.total_pages);
        if page == 0 || (total_pages > 0 && page > total_pages) {
            return;
        }
        self.load(api, page).await;
    }

    // --- Apresentação ---

    pub fn rows(&self) -> Vec<HistoryRow> {
        self.listing
            .as_ref()
            .map(|l| l.items.iter().map(HistoryRow::from_record).collect())
            .unwrap_or_default()
    }

    /// Controles de paginação; `None` quando há uma página só.
    pub fn page_controls(&self) -> Option<PageControls> {
        let listing = self.listing.as_ref()?;
        if listing.total_pages <= 1 {
            return None;
        }
        let current = listing.page.clamp(1, listing.total_pages);
        Some(PageControls {
            current,
            total_pages: listing.total_pages,
            prev_enabled: current > 1,
            next_enabled: current < listing.total_pages,
            pages: (1..=listing.total_pages).collect(),
        })
    }
}

/// Ordena pelo número do recibo (parte numérica, crescente). Números
/// ilegíveis vão para o fim, na ordem em que vieram.
pub fn sort_by_number(items: &mut [ReceiptRecord]) {
    items.sort_by(|a, b| {
        match (
            receipt_number_suffix(&a.receipt_number()),
            receipt_number_suffix(&b.receipt_number()),
        ) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(numbers: &[&str], page: u32, total_pages: u32) -> ReceiptListing {
        ReceiptListing {
            items: numbers
                .iter()
                .map(|n| ReceiptRecord::new(json!({ "id": n, "receiptNumber": n })))
                .collect(),
            page,
            limit: 10,
            total: numbers.len() as u64,
            total_pages,
        }
    }

    #[test]
    fn sorts_by_numeric_suffix() {
        let mut items = listing(&["M00010", "bogus", "M00002", "M00100"], 1, 1).items;
        sort_by_number(&mut items);
        let numbers: Vec<_> = items.iter().map(ReceiptRecord::receipt_number).collect();
        assert_eq!(numbers, ["M00002", "M00010", "M00100", "bogus"]);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut view = HistoryView::default();
        let first = view.request(1);
        view.set_query("jane");
        let second = view.request(1);

        assert!(view.apply(&second, Ok(listing(&["M00003"], 1, 1))));
        assert!(!view.apply(&first, Ok(listing(&["M00001", "M00002"], 1, 1))));
        assert_eq!(view.rows().len(), 1);
        assert!(!view.is_loading());
    }

    #[test]
    fn request_dispatch_depends_on_query() {
        let mut view = HistoryView::default();
        assert_eq!(view.request(2).query, None);
        view.set_query("  M0001 ");
        let request = view.request(0);
        assert_eq!(request.query.as_deref(), Some("M0001"));
        assert_eq!(request.page, 1);
    }

    #[test]
    fn page_controls_follow_total_pages() {
        let mut view = HistoryView::default();
        let request = view.request(1);
        view.apply(&request, Ok(listing(&["M00001"], 1, 1)));
        assert_eq!(view.page_controls(), None);

        let request = view.request(2);
        view.apply(&request, Ok(listing(&["M00011"], 2, 3)));
        assert_eq!(
            view.page_controls(),
            Some(PageControls {
                current: 2,
                total_pages: 3,
                prev_enabled: true,
                next_enabled: true,
                pages: vec![1, 2, 3],
            })
        );
    }

    #[test]
    fn failure_keeps_previous_listing() {
        let mut view = HistoryView::default();
        let request = view.request(1);
        view.apply(&request, Ok(listing(&["M00001"], 1, 1)));
        let request = view.request(1);
        view.apply(&request, Err(ClientError::Timeout));
        assert_eq!(view.rows().len(), 1);
        assert!(view.error().is_some());
    }
}
