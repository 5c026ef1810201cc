//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the rental backend.

pub mod rental_api_client;

// Re-export main types for convenience
pub use rental_api_client::{Batch, HttpRentalApi, Page, RentalApi};
