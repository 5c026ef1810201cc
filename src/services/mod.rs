//! Services module
//!
//! Lógica de negocio del ciclo de vida de alquileres y alertas.
//! Todas las funciones son puras: reciben el snapshot y `now` explícito.

pub mod aggregator;
pub mod alert_classifier;
pub mod alert_detection;
pub mod filters;
pub mod rental_billing;
pub mod status_resolver;

pub use aggregator::*;
pub use alert_classifier::*;
pub use alert_detection::*;
pub use filters::*;
pub use rental_billing::*;
pub use status_resolver::*;
