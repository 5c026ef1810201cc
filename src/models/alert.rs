//! Modelo de Alert
//!
//! Alertas de equipo. La resolución se modela como variante para que
//! `resolved_by` y `resolved_at` existan juntos o no existan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severidad ordinal: `High > Medium > Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            // el backend histórico emite "critical"
            "high" | "critical" => Ok(Severity::High),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorías cerradas de alerta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    OverdueReturn,
    IdleEquipment,
    LowUtilization,
    MaintenanceDue,
    Uncategorized,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 5] = [
        AlertCategory::OverdueReturn,
        AlertCategory::IdleEquipment,
        AlertCategory::LowUtilization,
        AlertCategory::MaintenanceDue,
        AlertCategory::Uncategorized,
    ];

    /// Tipo canónico usado al crear alertas nuevas
    pub fn canonical_type(&self) -> &'static str {
        match self {
            AlertCategory::OverdueReturn => "Overdue Return",
            AlertCategory::IdleEquipment => "Idle Equipment",
            AlertCategory::LowUtilization => "Low Utilization",
            AlertCategory::MaintenanceDue => "Maintenance Due",
            AlertCategory::Uncategorized => "Uncategorized",
        }
    }
}

/// Estado de resolución de una alerta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resolution {
    Unresolved,
    Resolved { by: String, at: DateTime<Utc> },
}

/// Alert principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub equipment_id: Option<i64>,
    pub rental_id: Option<i64>,
    /// Tipo libre tal como llega del backend
    pub alert_type: String,
    pub title: String,
    pub message: String,
    /// Severidad tal como llega; puede no ser uno de los tres niveles
    pub severity_label: String,
    pub resolution: Resolution,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Severidad declarada, si es un nivel reconocido
    pub fn severity(&self) -> Option<Severity> {
        self.severity_label.parse().ok()
    }

    pub fn resolved_by(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Resolved { by, .. } => Some(by),
            Resolution::Unresolved => None,
        }
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        match &self.resolution {
            Resolution::Resolved { at, .. } => Some(*at),
            Resolution::Unresolved => None,
        }
    }
}

/// Alerta nueva aún no persistida
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDraft {
    pub equipment_id: Option<i64>,
    pub rental_id: Option<i64>,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(
            vec![Severity::Low, Severity::High, Severity::Medium].into_iter().max(),
            Some(Severity::High)
        );
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::High);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_resolution_accessors() {
        let at = Utc::now();
        let resolution = Resolution::Resolved { by: "Jane".to_string(), at };
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["state"], "resolved");
        assert_eq!(json["by"], "Jane");
    }
}
