// src/services.rs

pub mod document_service;
pub use document_service::DocumentService;

pub mod receipt_service;
pub use receipt_service::ReceiptService;

pub mod reference_service;
pub use reference_service::ReferenceService;

pub mod seed_service;
pub use seed_service::SeedService;
