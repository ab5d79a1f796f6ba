// src/db.rs

pub mod receipt_repo;
pub use receipt_repo::ReceiptRepository;
pub mod reference_repo;
pub use reference_repo::ReferenceRepository;
