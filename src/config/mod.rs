//! Configuración del proyecto
//!
//! Este módulo contiene la configuración por variables de entorno del
//! gateway y del cliente del backend de alquileres.

pub mod environment;

pub use environment::*;
