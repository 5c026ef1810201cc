use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Equipment, EquipmentStatus};
use crate::utils::errors::{field_error, AppError};
use crate::utils::validation::{
    parse_optional_timestamp, parse_timestamp, validate_business_id, validate_non_negative,
    validate_not_empty,
};

// Payload de equipo tal como lo devuelve el backend
#[derive(Debug, Clone, Deserialize)]
pub struct RawEquipment {
    pub id: i64,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub year: Option<i32>,
    pub serial_number: Option<String>,
    pub site_id: Option<String>,
    pub last_operator_id: Option<String>,
    pub status: Option<String>,
    pub last_maintenance: Option<String>,
    pub next_maintenance: Option<String>,
    pub engine_hours_per_day: Option<f64>,
    pub idle_hours_per_day: Option<f64>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

pub(crate) fn parse_hours(field: &'static str, value: Option<f64>) -> Result<f64, AppError> {
    let hours = value.unwrap_or(0.0);
    if !hours.is_finite() {
        let mut error = ValidationError::new("hours");
        error.add_param("value".into(), &hours.to_string());
        return Err(field_error(field, error));
    }
    validate_non_negative(hours).map_err(|e| field_error(field, e))?;
    Ok(hours)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<RawEquipment> for Equipment {
    type Error = AppError;

    fn try_from(raw: RawEquipment) -> Result<Self, Self::Error> {
        validate_not_empty(&raw.equipment_id).map_err(|e| field_error("equipment_id", e))?;
        validate_not_empty(&raw.equipment_type).map_err(|e| field_error("type", e))?;

        let created_at =
            parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?;
        let updated_at = parse_optional_timestamp(raw.updated_at.as_deref())
            .map_err(|e| field_error("updated_at", e))?
            .unwrap_or(created_at);

        Ok(Equipment {
            id: raw.id,
            equipment_id: raw.equipment_id,
            equipment_type: raw.equipment_type.trim().to_string(),
            model: non_blank(raw.model),
            manufacturer: non_blank(raw.manufacturer),
            year: raw.year,
            serial_number: non_blank(raw.serial_number),
            site_id: non_blank(raw.site_id),
            last_operator_id: non_blank(raw.last_operator_id),
            status: raw
                .status
                .as_deref()
                .map(EquipmentStatus::parse)
                .unwrap_or(EquipmentStatus::Available),
            last_maintenance: parse_optional_timestamp(raw.last_maintenance.as_deref())
                .map_err(|e| field_error("last_maintenance", e))?,
            next_maintenance: parse_optional_timestamp(raw.next_maintenance.as_deref())
                .map_err(|e| field_error("next_maintenance", e))?,
            engine_hours_per_day: parse_hours("engine_hours_per_day", raw.engine_hours_per_day)?,
            idle_hours_per_day: parse_hours("idle_hours_per_day", raw.idle_hours_per_day)?,
            created_at,
            updated_at,
        })
    }
}

// Request para crear un equipo
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateEquipmentRequest {
    #[validate(custom = "validate_business_id")]
    pub equipment_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub equipment_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub engine_hours_per_day: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub idle_hours_per_day: f64,
    #[serde(default = "default_status")]
    pub status: EquipmentStatus,
}

fn default_status() -> EquipmentStatus {
    EquipmentStatus::Available
}

// Request para actualizar un equipo (solo se envían los campos presentes)
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateEquipmentRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50))]
    pub equipment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 24.0))]
    pub engine_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 24.0))]
    pub idle_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawEquipment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_equipment_conversion() {
        let equipment = Equipment::try_from(raw(json!({
            "id": 7,
            "equipment_id": "EQX1027",
            "type": "Excavator",
            "site_id": "S003",
            "engine_hours_per_day": 6.5,
            "idle_hours_per_day": null,
            "status": "Rented",
            "created_at": "2024-02-01T08:30:00"
        })))
        .unwrap();

        assert_eq!(equipment.status, EquipmentStatus::Rented);
        assert_eq!(equipment.idle_hours_per_day, 0.0);
        assert_eq!(equipment.updated_at, equipment.created_at);
        assert_eq!(equipment.site_id.as_deref(), Some("S003"));
    }

    #[test]
    fn test_raw_equipment_rejects_bad_payloads() {
        let negative = raw(json!({
            "id": 1, "equipment_id": "EQX1", "type": "Crane",
            "engine_hours_per_day": -1.0, "created_at": "2024-02-01"
        }));
        assert!(matches!(Equipment::try_from(negative), Err(AppError::Validation(_))));

        let bad_date = raw(json!({
            "id": 1, "equipment_id": "EQX1", "type": "Crane", "created_at": "yesterday"
        }));
        assert!(Equipment::try_from(bad_date).is_err());

        let blank_id = raw(json!({
            "id": 1, "equipment_id": "  ", "type": "Crane", "created_at": "2024-02-01"
        }));
        assert!(Equipment::try_from(blank_id).is_err());
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let update = UpdateEquipmentRequest {
            status: Some(EquipmentStatus::Maintenance),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"status": "maintenance"}));
    }

    #[test]
    fn test_create_validation() {
        let request: CreateEquipmentRequest = serde_json::from_value(json!({
            "equipment_id": "not an id",
            "type": "Crane",
            "engine_hours_per_day": 30.0
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("equipment_id"));
        assert!(fields.contains_key("engine_hours_per_day"));
    }
}
