// src/startup.rs

use axum::{
    Router,
    http::HeaderValue,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Router completo: API REST, página do recibo, Swagger, CORS e tracing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.settings.cors_allow_origin);

    let receipt_routes = Router::new()
        .route("/"
               ,get(handlers::receipts::list_receipts)
               .post(handlers::receipts::create_receipt)
        )
        .route("/search", get(handlers::receipts::search_receipts))
        .route("/{id}"
               ,get(handlers::receipts::get_receipt)
               .delete(handlers::receipts::delete_receipt)
        );

    let hotel_routes = Router::new()
        .route("/"
               ,get(handlers::references::list_hotels)
               .post(handlers::references::create_hotel)
        )
        .route("/{id}", axum::routing::delete(handlers::references::delete_hotel));

    let car_rental_routes = Router::new()
        .route("/"
               ,get(handlers::references::list_car_rentals)
               .post(handlers::references::create_car_rental)
        )
        .route("/{id}", axum::routing::delete(handlers::references::delete_car_rental));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/receipts", receipt_routes)
        .nest("/api/hotels", hotel_routes)
        .nest("/api/car-rentals", car_rental_routes)
        .route("/receipt/{id}", get(handlers::pages::receipt_page))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

// "*" libera qualquer origem; senão, só a origem configurada.
fn cors_layer(allow_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match allow_origin.trim() {
        "*" | "" => layer.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!("⚠️ CORS_ALLOW_ORIGIN inválido ({}), liberando qualquer origem", origin);
                layer.allow_origin(Any)
            }
        },
    }
}
