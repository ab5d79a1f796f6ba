// src/handlers/receipts.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, SearchQuery},
    },
    config::AppState,
    models::receipt::{CreateReceiptPayload, ReceiptListResponse, ReceiptWithActivities},
};

// POST /api/receipts
#[utoipa::path(
    post,
    path = "/api/receipts",
    tag = "Receipts",
    request_body = CreateReceiptPayload,
    responses(
        (status = 201, description = "Recibo criado, com número e atividades", body = ReceiptWithActivities),
        (status = 400, description = "Dados inválidos (detalhes por campo)")
    )
)]
pub async fn create_receipt(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReceiptPayload>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = app_state
        .receipt_service
        .create(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

// GET /api/receipts
#[utoipa::path(
    get,
    path = "/api/receipts",
    tag = "Receipts",
    params(ListQuery),
    responses(
        (status = 200, description = "Página de recibos", body = ReceiptListResponse)
    )
)]
pub async fn list_receipts(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .receipt_service
        .list(&app_state.db_pool, query.paging())
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/receipts/search
#[utoipa::path(
    get,
    path = "/api/receipts/search",
    tag = "Receipts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Recibos encontrados", body = ReceiptListResponse),
        (status = 400, description = "Busca sem termo")
    )
)]
pub async fn search_receipts(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Rejeita antes de pegar conexão
    let term = query.term().ok_or(AppError::EmptySearchQuery)?;

    let page = app_state
        .receipt_service
        .search(&app_state.db_pool, Some(term), query.paging())
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/receipts/{id}
#[utoipa::path(
    get,
    path = "/api/receipts/{id}",
    tag = "Receipts",
    params(("id" = String, Path, description = "ID do recibo")),
    responses(
        (status = 200, description = "Recibo com atividades", body = ReceiptWithActivities),
        (status = 404, description = "Recibo não encontrado")
    )
)]
pub async fn get_receipt(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = app_state.receipt_service.get(&app_state.db_pool, &id).await?;
    Ok((StatusCode::OK, Json(receipt)))
}

// DELETE /api/receipts/{id}
#[utoipa::path(
    delete,
    path = "/api/receipts/{id}",
    tag = "Receipts",
    params(("id" = String, Path, description = "ID do recibo")),
    responses(
        (status = 204, description = "Recibo excluído"),
        (status = 404, description = "Recibo não encontrado")
    )
)]
pub async fn delete_receipt(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.receipt_service.delete(&app_state.db_pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
