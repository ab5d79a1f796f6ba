// src/handlers/references.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::reference::{CarRental, Hotel, HotelQuery, NewCarRental, NewHotel},
};

// =============================================================================
//  HOTÉIS
// =============================================================================

// GET /api/hotels
#[utoipa::path(
    get,
    path = "/api/hotels",
    tag = "References",
    params(HotelQuery),
    responses(
        (status = 200, description = "Lista de hotéis", body = Vec<Hotel>)
    )
)]
pub async fn list_hotels(
    State(app_state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> Result<impl IntoResponse, AppError> {
    let hotels = app_state
        .reference_service
        .list_hotels(&app_state.db_pool, query.city.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(hotels)))
}

// POST /api/hotels
#[utoipa::path(
    post,
    path = "/api/hotels",
    tag = "References",
    request_body = NewHotel,
    responses(
        (status = 201, description = "Hotel cadastrado", body = Hotel),
        (status = 400, description = "Nome e endereço são obrigatórios")
    )
)]
pub async fn create_hotel(
    State(app_state): State<AppState>,
    Json(payload): Json<NewHotel>,
) -> Result<impl IntoResponse, AppError> {
    let hotel = app_state
        .reference_service
        .create_hotel(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(hotel)))
}

// DELETE /api/hotels/{id}
#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    tag = "References",
    params(("id" = Uuid, Path, description = "ID do hotel")),
    responses(
        (status = 204, description = "Hotel excluído"),
        (status = 404, description = "Hotel não encontrado")
    )
)]
pub async fn delete_hotel(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reference_service.delete_hotel(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  LOCADORAS
// =============================================================================

// GET /api/car-rentals
#[utoipa::path(
    get,
    path = "/api/car-rentals",
    tag = "References",
    responses(
        (status = 200, description = "Lista de locadoras", body = Vec<CarRental>)
    )
)]
pub async fn list_car_rentals(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rentals = app_state
        .reference_service
        .list_car_rentals(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(rentals)))
}

// POST /api/car-rentals
#[utoipa::path(
    post,
    path = "/api/car-rentals",
    tag = "References",
    request_body = NewCarRental,
    responses(
        (status = 201, description = "Locadora cadastrada", body = CarRental),
        (status = 400, description = "Nome e endereço são obrigatórios")
    )
)]
pub async fn create_car_rental(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCarRental>,
) -> Result<impl IntoResponse, AppError> {
    let rental = app_state
        .reference_service
        .create_car_rental(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(rental)))
}

// DELETE /api/car-rentals/{id}
#[utoipa::path(
    delete,
    path = "/api/car-rentals/{id}",
    tag = "References",
    params(("id" = Uuid, Path, description = "ID da locadora")),
    responses(
        (status = 204, description = "Locadora excluída"),
        (status = 404, description = "Locadora não encontrada")
    )
)]
pub async fn delete_car_rental(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reference_service.delete_car_rental(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
