//! Modelo de Equipment
//!
//! Equipo de construcción/minería tal como lo expone el backend, ya
//! validado por la frontera de parseo (`dto::equipment_dto`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado almacenado del equipo.
///
/// Cualquier valor fuera de los cuatro conocidos se conserva como
/// `Unrecognized` para poder contarlo como señal de calidad de datos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EquipmentStatus {
    Available,
    Rented,
    Maintenance,
    OutOfService,
    Unrecognized(String),
}

impl EquipmentStatus {
    /// Conversión total desde el string del backend
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "available" => EquipmentStatus::Available,
            "rented" => EquipmentStatus::Rented,
            "maintenance" => EquipmentStatus::Maintenance,
            "out_of_service" | "out of service" => EquipmentStatus::OutOfService,
            _ => EquipmentStatus::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EquipmentStatus::Available => "available",
            EquipmentStatus::Rented => "rented",
            EquipmentStatus::Maintenance => "maintenance",
            EquipmentStatus::OutOfService => "out_of_service",
            EquipmentStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EquipmentStatus::Unrecognized(_))
    }
}

impl From<String> for EquipmentStatus {
    fn from(value: String) -> Self {
        EquipmentStatus::parse(&value)
    }
}

impl From<EquipmentStatus> for String {
    fn from(status: EquipmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equipment principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
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
    pub status: EquipmentStatus,
    pub last_maintenance: Option<DateTime<Utc>>,
    /// Informativo: nunca cambia el estado por sí mismo
    pub next_maintenance: Option<DateTime<Utc>>,
    pub engine_hours_per_day: f64,
    pub idle_hours_per_day: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Proporción de horas de motor sobre horas totales (motor + ralentí)
    pub fn utilization_ratio(&self) -> Option<f64> {
        let total = self.engine_hours_per_day + self.idle_hours_per_day;
        if total > 0.0 {
            Some(self.engine_hours_per_day / total)
        } else {
            None
        }
    }

    /// Nombre visible: "Excavator 320D" o solo el tipo
    pub fn display_name(&self) -> String {
        match &self.model {
            Some(model) if !model.trim().is_empty() => {
                format!("{} {}", self.equipment_type, model.trim())
            }
            _ => self.equipment_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_total() {
        assert_eq!(EquipmentStatus::parse("Available"), EquipmentStatus::Available);
        assert_eq!(EquipmentStatus::parse(" rented "), EquipmentStatus::Rented);
        assert_eq!(EquipmentStatus::parse("out_of_service"), EquipmentStatus::OutOfService);
        assert_eq!(
            EquipmentStatus::parse("retired"),
            EquipmentStatus::Unrecognized("retired".to_string())
        );
        assert!(!EquipmentStatus::parse("").is_recognized());
    }

    #[test]
    fn test_status_serializes_as_string() {
        let json = serde_json::to_string(&EquipmentStatus::OutOfService).unwrap();
        assert_eq!(json, "\"out_of_service\"");

        let back: EquipmentStatus = serde_json::from_str("\"scrapped\"").unwrap();
        assert_eq!(back.as_str(), "scrapped");
    }
}
