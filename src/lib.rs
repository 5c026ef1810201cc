//! Rental tracker gateway
//!
//! Gateway HTTP delante del backend de alquileres de maquinaria: parsea las
//! respuestas en tipos estrictos, deriva estados, costes y alertas, y sirve
//! el último snapshot conocido cuando el backend no responde.

pub mod cache;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
