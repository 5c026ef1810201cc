//! Modelo de registro de uso
//!
//! Lectura diaria de horas de motor, ralentí y combustible de un equipo
//! durante un alquiler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageLog {
    pub id: i64,
    pub rental_id: i64,
    pub equipment_id: i64,
    pub operator_id: Option<i64>,
    pub date: DateTime<Utc>,
    pub engine_hours: f64,
    pub idle_hours: f64,
    pub fuel_usage: f64,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    /// Escala 1-10
    pub condition_rating: Option<u8>,
    pub maintenance_required: bool,
    pub maintenance_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ámbito de consulta de registros de uso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageScope {
    Rental(i64),
    Equipment(i64),
}
