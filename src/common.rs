// src/common.rs

pub mod dates;
pub mod error;
pub mod fields;
pub mod pagination;
pub mod rules;

pub use error::AppError;
