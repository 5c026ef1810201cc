//! Modelo de Rental
//!
//! Contrato de alquiler validado. El estado almacenado nunca se reescribe
//! desde una lectura; el estado visible lo deriva
//! `services::status_resolver`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Estado del alquiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Completed,
    Overdue,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Overdue => "overdue",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Estados fijados externamente que nunca se sobreescriben
    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::Cancelled)
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(RentalStatus::Active),
            "completed" => Ok(RentalStatus::Completed),
            "overdue" => Ok(RentalStatus::Overdue),
            "cancelled" | "canceled" => Ok(RentalStatus::Cancelled),
            other => Err(format!("unknown rental status '{}'", other)),
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rental principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rental {
    pub id: i64,
    pub rental_ref: String,
    pub equipment_id: i64,
    pub site_id: Option<i64>,
    pub operator_id: Option<i64>,
    /// Código de negocio del equipo cuando el backend lo incluye anidado
    pub equipment_code: Option<String>,
    pub site_name: Option<String>,
    pub operator_name: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub status: RentalStatus,
    pub daily_rate: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    /// Referencia por defecto cuando el backend no trae una: RNT-0042
    pub fn default_ref(id: i64) -> String {
        format!("RNT-{:04}", id)
    }
}
