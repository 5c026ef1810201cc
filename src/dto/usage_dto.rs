use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::UsageLog;
use crate::utils::errors::{field_error, AppError};
use crate::utils::validation::parse_timestamp;

use super::equipment_dto::parse_hours;

// Payload de registro de uso (`/usage-logs/...`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawUsageLog {
    pub id: i64,
    pub rental_id: i64,
    pub equipment_id: i64,
    pub operator_id: Option<i64>,
    pub date: String,
    pub engine_hours: Option<f64>,
    pub idle_hours: Option<f64>,
    pub fuel_usage: Option<f64>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub condition_rating: Option<i64>,
    pub maintenance_required: Option<bool>,
    pub maintenance_notes: Option<String>,
    pub created_at: String,
}

fn parse_rating(value: Option<i64>) -> Result<Option<u8>, AppError> {
    match value {
        None => Ok(None),
        Some(rating @ 1..=10) => Ok(Some(rating as u8)),
        Some(rating) => {
            let mut error = ValidationError::new("range");
            error.add_param("value".into(), &rating);
            error.add_param("min".into(), &1);
            error.add_param("max".into(), &10);
            Err(field_error("condition_rating", error))
        }
    }
}

impl TryFrom<RawUsageLog> for UsageLog {
    type Error = AppError;

    fn try_from(raw: RawUsageLog) -> Result<Self, Self::Error> {
        Ok(UsageLog {
            id: raw.id,
            rental_id: raw.rental_id,
            equipment_id: raw.equipment_id,
            operator_id: raw.operator_id,
            date: parse_timestamp(&raw.date).map_err(|e| field_error("date", e))?,
            engine_hours: parse_hours("engine_hours", raw.engine_hours)?,
            idle_hours: parse_hours("idle_hours", raw.idle_hours)?,
            fuel_usage: parse_hours("fuel_usage", raw.fuel_usage)?,
            location_lat: raw.location_lat,
            location_lng: raw.location_lng,
            condition_rating: parse_rating(raw.condition_rating)?,
            maintenance_required: raw.maintenance_required.unwrap_or(false),
            maintenance_notes: raw
                .maintenance_notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?,
        })
    }
}

// Request para registrar uso diario
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateUsageLogRequest {
    #[validate(range(min = 1))]
    pub rental_id: i64,
    #[validate(range(min = 1))]
    pub equipment_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub engine_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub idle_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fuel_usage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10))]
    pub condition_rating: Option<u8>,
    #[serde(default)]
    pub maintenance_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_notes: Option<String>,
}
