// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Receipts API", description = "Recibos de viagem: criação, busca, PDF e catálogos"),
    paths(
        // --- Receipts ---
        handlers::receipts::create_receipt,
        handlers::receipts::list_receipts,
        handlers::receipts::search_receipts,
        handlers::receipts::get_receipt,
        handlers::receipts::delete_receipt,

        // --- References ---
        handlers::references::list_hotels,
        handlers::references::create_hotel,
        handlers::references::delete_hotel,
        handlers::references::list_car_rentals,
        handlers::references::create_car_rental,
        handlers::references::delete_car_rental,
    ),
    components(
        schemas(
            // --- Receipts ---
            models::receipt::ActivityType,
            models::receipt::TransferType,
            models::receipt::Receipt,
            models::receipt::Activity,
            models::receipt::ReceiptWithActivities,
            models::receipt::ReceiptListResponse,

            // --- Payloads ---
            models::receipt::CreateReceiptPayload,
            models::receipt::ActivityPayload,
            models::reference::NewHotel,
            models::reference::NewCarRental,

            // --- References ---
            models::reference::Hotel,
            models::reference::CarRental,
        )
    ),
    tags(
        (name = "Receipts", description = "Recibos e suas atividades"),
        (name = "References", description = "Catálogos de hotéis e locadoras")
    )
)]
pub struct ApiDoc;
