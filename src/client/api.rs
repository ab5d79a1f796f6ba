// src/client/api.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    common::{
        fields::{self, Field},
        pagination::total_pages,
    },
    models::{
        receipt::CreateReceiptPayload,
        record::ReceiptRecord,
        reference::{CarRental, Hotel, NewCarRental, NewHotel},
    },
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
//  CONFIGURAÇÃO
// =============================================================================

/// Configuração do cliente, montada uma vez e passada explicitamente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `RECEIPTS_API_URL` e `RECEIPTS_API_TIMEOUT_SECS` (lê `.env` se houver).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("RECEIPTS_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = lookup("RECEIPTS_API_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self::new(base_url).with_timeout(timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// =============================================================================
//  ERROS
// =============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("A requisição excedeu o tempo limite")]
    Timeout,

    #[error("Falha de rede: {0}")]
    Network(String),

    #[error("Registro não encontrado")]
    NotFound,

    #[error("Backend respondeu {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Resposta inesperada do backend: {0}")]
    Decode(String),
}

impl ClientError {
    /// Mensagem única exibida perto da ação que falhou.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Timeout => "The server took too long to respond. Please try again.".to_string(),
            ClientError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ClientError::NotFound => "Not found".to_string(),
            ClientError::Backend { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Backend { .. } | ClientError::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

// =============================================================================
//  LISTAGEM
// =============================================================================

/// Página de recibos como a tela de histórico usa.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptListing {
    pub items: Vec<ReceiptRecord>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl ReceiptListing {
    /// Aceita o envelope `{data, page, limit, total, totalPages}` e também
    /// um array puro (versões antigas do backend).
    pub fn from_value(value: Value, page: u32, limit: u32) -> Result<Self, ClientError> {
        match value {
            Value::Array(items) => {
                let total = items.len() as u64;
                Ok(Self {
                    items: items.into_iter().map(ReceiptRecord::new).collect(),
                    page,
                    limit,
                    total,
                    total_pages: u32::from(total > 0),
                })
            }
            Value::Object(_) => {
                let items = match fields::get(Some(&value), Field::Data) {
                    Value::Array(items) => items.iter().cloned().map(ReceiptRecord::new).collect(),
                    _ => return Err(ClientError::Decode("envelope sem lista de recibos".into())),
                };
                let number = |field: Field| fields::get(Some(&value), field).as_u64();
                let page = number(Field::Page).map_or(page, |p| p as u32);
                let limit = number(Field::Limit).map_or(limit, |l| l as u32);
                let total = number(Field::Total).unwrap_or(0);
                let total_pages = number(Field::TotalPages)
                    .map(|t| t as u32)
                    .unwrap_or_else(|| total_pages(total as i64, i64::from(limit)) as u32);
                Ok(Self { items, page, limit, total, total_pages })
            }
            other => Err(ClientError::Decode(format!("lista inesperada: {other}"))),
        }
    }
}

// =============================================================================
//  CONTRATO
// =============================================================================

#[async_trait]
pub trait ReceiptsApi: Send + Sync {
    async fn create_receipt(&self, payload: &CreateReceiptPayload) -> Result<ReceiptRecord, ClientError>;
    async fn list_receipts(&self, page: u32, limit: u32) -> Result<ReceiptListing, ClientError>;
    async fn search_receipts(&self, query: &str, page: u32, limit: u32) -> Result<ReceiptListing, ClientError>;
    async fn get_receipt(&self, id: &str) -> Result<ReceiptRecord, ClientError>;

    async fn list_hotels(&self) -> Result<Vec<Hotel>, ClientError>;
    async fn create_hotel(&self, hotel: &NewHotel) -> Result<Hotel, ClientError>;
    async fn delete_hotel(&self, id: Uuid) -> Result<(), ClientError>;

    async fn list_car_rentals(&self) -> Result<Vec<CarRental>, ClientError>;
    async fn create_car_rental(&self, rental: &NewCarRental) -> Result<CarRental, ClientError>;
    async fn delete_car_rental(&self, id: Uuid) -> Result<(), ClientError>;
}

// =============================================================================
//  CLIENTE HTTP
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    client: ReqwestClient,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.config.url(path))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            warn!(%method, %url, error = %err, "HTTP request failed");
            ClientError::from(err)
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();
        warn!(%method, %url, %status, %message, "backend rejected request");
        Err(ClientError::Backend { status: status.as_u16(), message })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }
}

#[async_trait]
impl ReceiptsApi for ApiClient {
    async fn create_receipt(&self, payload: &CreateReceiptPayload) -> Result<ReceiptRecord, ClientError> {
        self.post_json("/api/receipts", payload).await
    }

    async fn list_receipts(&self, page: u32, limit: u32) -> Result<ReceiptListing, ClientError> {
        let builder = self
            .request(Method::GET, "/api/receipts")
            .query(&[("page", page), ("limit", limit)]);
        let body: Value = self.send_json(builder).await?;
        ReceiptListing::from_value(body, page, limit)
    }

    async fn search_receipts(&self, query: &str, page: u32, limit: u32) -> Result<ReceiptListing, ClientError> {
        let builder = self
            .request(Method::GET, "/api/receipts/search")
            .query(&[("q", query.to_string()), ("page", page.to_string()), ("limit", limit.to_string())]);
        let body: Value = self.send_json(builder).await?;
        ReceiptListing::from_value(body, page, limit)
    }

    async fn get_receipt(&self, id: &str) -> Result<ReceiptRecord, ClientError> {
        let path = format!("/api/receipts/{id}");
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, ClientError> {
        self.send_json(self.request(Method::GET, "/api/hotels")).await
    }

    async fn create_hotel(&self, hotel: &NewHotel) -> Result<Hotel, ClientError> {
        self.post_json("/api/hotels", hotel).await
    }

    async fn delete_hotel(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/api/hotels/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn list_car_rentals(&self) -> Result<Vec<CarRental>, ClientError> {
        self.send_json(self.request(Method::GET, "/api/car-rentals")).await
    }

    async fn create_car_rental(&self, rental: &NewCarRental) -> Result<CarRental, ClientError> {
        self.post_json("/api/car-rentals", rental).await
    }

    async fn delete_car_rental(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/api/car-rentals/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_from_lookup() {
        let config = ApiConfig::from_lookup(|key| match key {
            "RECEIPTS_API_URL" => Some("https://api.example.com/".into()),
            "RECEIPTS_API_TIMEOUT_SECS" => Some("3".into()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.url("/api/hotels"), "https://api.example.com/api/hotels");

        let defaults = ApiConfig::from_lookup(|_| None);
        assert_eq!(defaults, ApiConfig::default());
    }

    #[test]
    fn listing_from_envelope_in_either_convention() {
        let listing = ReceiptListing::from_value(
            json!({ "data": [{ "id": "a" }], "page": 2, "limit": 5, "total": 6, "total_pages": 2 }),
            1,
            10,
        )
        .unwrap();
        assert_eq!((listing.page, listing.limit, listing.total, listing.total_pages), (2, 5, 6, 2));
        assert_eq!(listing.items.len(), 1);
    }

    #[test]
    fn listing_from_bare_array() {
        let listing = ReceiptListing::from_value(json!([{ "id": "a" }, { "id": "b" }]), 1, 10).unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.total_pages, 1);

        let empty = ReceiptListing::from_value(json!([]), 1, 10).unwrap();
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn listing_computes_missing_total_pages() {
        let listing = ReceiptListing::from_value(json!({ "data": [], "total": 21, "limit": 10 }), 1, 10).unwrap();
        assert_eq!(listing.total_pages, 3);
    }

    #[test]
    fn listing_rejects_garbage() {
        assert!(ReceiptListing::from_value(json!("nope"), 1, 10).is_err());
        assert!(ReceiptListing::from_value(json!({ "data": 3 }), 1, 10).is_err());
    }

    #[test]
    fn backend_messages_are_surfaced() {
        let err = ClientError::Backend { status: 400, message: "Search query is required".into() };
        assert_eq!(err.user_message(), "Search query is required");
        let err = ClientError::Backend { status: 500, message: String::new() };
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }
}
