// src/models.rs

pub mod receipt;
pub mod record;
pub mod reference;
