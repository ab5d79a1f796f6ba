// src/handlers.rs

pub mod pages;
pub mod receipts;
pub mod references;
