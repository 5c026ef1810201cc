//! Middleware del sistema
//!
//! Este módulo contiene el middleware HTTP compartido por el router.

pub mod cors;

pub use cors::*;
