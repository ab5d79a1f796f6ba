// src/client/routes.rs

use reqwest::Url;

/// Páginas do cliente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CreateReceipt,
    History,
    Receipt { id: String, download: bool },
    References,
}

impl Route {
    pub fn receipt(id: impl Into<String>) -> Self {
        Route::Receipt { id: id.into(), download: false }
    }

    pub fn path(&self) -> String {
        match self {
            Route::CreateReceipt => "/".to_string(),
            Route::History => "/history".to_string(),
            Route::Receipt { id, download: false } => format!("/receipt/{id}"),
            Route::Receipt { id, download: true } => format!("/receipt/{id}?download=true"),
            Route::References => "/references".to_string(),
        }
    }

    /// Aceita caminho (`/receipt/abc?download=true`) ou URL completa.
    pub fn parse(input: &str) -> Option<Route> {
        let base = Url::parse("http://localhost").ok()?;
        let url = base.join(input.trim()).ok()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Some(Route::CreateReceipt),
            ["history"] => Some(Route::History),
            ["references"] => Some(Route::References),
            ["receipt", id] => {
                let download = url
                    .query_pairs()
                    .any(|(key, value)| key == "download" && value == "true");
                Some(Route::Receipt { id: (*id).to_string(), download })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_page() {
        assert_eq!(Route::parse("/"), Some(Route::CreateReceipt));
        assert_eq!(Route::parse("/history"), Some(Route::History));
        assert_eq!(Route::parse("/references/"), Some(Route::References));
        assert_eq!(Route::parse("/receipt/abc123"), Some(Route::receipt("abc123")));
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn download_flag_round_trips_through_qr_url() {
        let route = Route::parse("https://receipts.example.com/receipt/abc123?download=true").unwrap();
        assert_eq!(route, Route::Receipt { id: "abc123".into(), download: true });
        assert_eq!(route.path(), "/receipt/abc123?download=true");

        let route = Route::parse("/receipt/abc123?download=false").unwrap();
        assert_eq!(route, Route::receipt("abc123"));
    }
}
