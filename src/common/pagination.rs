// src/common/pagination.rs

use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Maior página cujo OFFSET ainda cabe em `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Página pedida, já normalizada (página >= 1, limite em 1..=100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: i64,
}

impl Paging {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        total_pages(total, self.limit)
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Página (a partir de 1)
    pub page: Option<i64>,
    /// Itens por página (1..=100, padrão 10)
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn paging(&self) -> Paging {
        Paging::new(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Texto buscado em número, nome, e-mail e telefone
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl SearchQuery {
    pub fn paging(&self) -> Paging {
        Paging::new(self.page, self.limit)
    }

    /// Termo aparado; `None` quando vazio.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
