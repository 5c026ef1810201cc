use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Alert, AlertCategory, AlertDraft, Resolution, Severity};
use crate::services::alert_classifier::{
    effective_severity, icon_for_label, ClassifierRules, IconKind,
};
use crate::services::status_resolver::is_alert_active;
use crate::utils::errors::{field_error, validation_error, AppError};
use crate::utils::validation::{parse_optional_timestamp, parse_timestamp, validate_not_empty};

// Payload de alerta
#[derive(Debug, Clone, Deserialize)]
pub struct RawAlert {
    pub id: i64,
    pub rental_id: Option<i64>,
    pub equipment_id: Option<i64>,
    pub alert_type: String,
    pub severity: Option<String>,
    pub title: String,
    #[serde(alias = "message")]
    pub description: Option<String>,
    // flag del ORM; el schema público lo expone como `resolved` y no es fiable
    pub is_resolved: Option<bool>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<String>,
    pub created_at: String,
}

impl TryFrom<RawAlert> for Alert {
    type Error = AppError;

    fn try_from(raw: RawAlert) -> Result<Self, Self::Error> {
        validate_not_empty(&raw.title).map_err(|e| field_error("title", e))?;

        let resolved_at = parse_optional_timestamp(raw.resolved_at.as_deref())
            .map_err(|e| field_error("resolved_at", e))?;
        let resolved_by = raw
            .resolved_by
            .map(|by| by.trim().to_string())
            .filter(|by| !by.is_empty());

        // la fecha de resolución manda; `resolved` llega en false aunque exista
        let resolution = match (raw.is_resolved, resolved_at) {
            (Some(true), None) => {
                return Err(validation_error(
                    "resolved_at",
                    "resolved alert is missing its resolution date",
                ))
            }
            (_, Some(at)) => Resolution::Resolved {
                by: resolved_by.unwrap_or_else(|| "unknown".to_string()),
                at,
            },
            (_, None) => Resolution::Unresolved,
        };

        Ok(Alert {
            id: raw.id,
            equipment_id: raw.equipment_id,
            rental_id: raw.rental_id,
            alert_type: raw.alert_type,
            title: raw.title.trim().to_string(),
            message: raw.description.unwrap_or_default(),
            severity_label: raw.severity.unwrap_or_default(),
            resolution,
            created_at: parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?,
        })
    }
}

// Request de creación que espera el backend
#[derive(Debug, Clone, Serialize)]
pub struct CreateAlertRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i64>,
    pub alert_type: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub resolved: bool,
}

impl From<&AlertDraft> for CreateAlertRequest {
    fn from(draft: &AlertDraft) -> Self {
        Self {
            rental_id: draft.rental_id,
            equipment_id: draft.equipment_id,
            alert_type: draft.category.canonical_type().to_string(),
            severity: draft.severity,
            title: draft.title.clone(),
            description: draft.message.clone(),
            resolved: false,
        }
    }
}

// Request para resolver una alerta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResolveAlertRequest {
    #[validate(length(min = 1, max = 100))]
    pub resolved_by: String,
}

// Response de alerta con clasificación y presentación
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub is_active: bool,
    pub category: AlertCategory,
    pub severity: Severity,
    pub icon: IconKind,
    pub color: &'static str,
    pub glyph: &'static str,
}

impl AlertView {
    pub fn classify(alert: Alert, rules: &ClassifierRules) -> Self {
        // el icono refleja la etiqueta recibida; `Info` si no es reconocible
        let icon = icon_for_label(&alert.severity_label);
        Self {
            is_active: is_alert_active(&alert),
            category: AlertCategory::from_type(&alert.alert_type, rules),
            severity: effective_severity(&alert, rules),
            icon,
            color: icon.color(),
            glyph: icon.glyph(),
            alert,
        }
    }
}

// Resultado de la detección de alertas
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub created: Vec<AlertView>,
    pub overdue_candidates: usize,
    pub equipment_candidates: usize,
    pub usage_candidates: usize,
    pub failed: usize,
    pub detected_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawAlert {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_alert_resolution_states() {
        let open = Alert::try_from(raw(json!({
            "id": 1, "alert_type": "overdue", "severity": "high",
            "title": "Rental overdue", "description": "3 days late",
            "resolved": false, "created_at": "2024-03-01T10:00:00"
        })))
        .unwrap();
        assert!(is_alert_active(&open));
        assert_eq!(open.message, "3 days late");

        let closed = Alert::try_from(raw(json!({
            "id": 2, "alert_type": "overdue", "severity": "high", "title": "Rental overdue",
            "is_resolved": true, "resolved_at": "2024-03-02T10:00:00", "resolved_by": "Jane",
            "created_at": "2024-03-01T10:00:00"
        })))
        .unwrap();
        assert_eq!(closed.resolved_by(), Some("Jane"));
    }

    #[test]
    fn test_raw_alert_rejects_flag_without_date() {
        let flagged_without_date = raw(json!({
            "id": 3, "alert_type": "overdue", "title": "x", "is_resolved": true,
            "created_at": "2024-03-01"
        }));
        assert!(Alert::try_from(flagged_without_date).is_err());
    }

    #[test]
    fn test_resolution_date_wins_over_public_flag() {
        // forma exacta del schema público: `resolved` siempre en false
        let alert = Alert::try_from(raw(json!({
            "id": 4, "rental_id": 12, "equipment_id": 3,
            "alert_type": "overdue", "severity": "high",
            "title": "Rental Overdue", "description": "Rental is 2 days overdue",
            "resolved": false, "resolved_at": "2024-03-02T10:00:00",
            "created_at": "2024-03-01T10:00:00"
        })))
        .unwrap();
        assert!(!is_alert_active(&alert));
        assert_eq!(alert.resolved_by(), Some("unknown"));

        // `resolved: true` sin fecha tampoco basta para cerrarla
        let open = Alert::try_from(raw(json!({
            "id": 5, "alert_type": "overdue", "title": "x", "resolved": true,
            "created_at": "2024-03-01"
        })))
        .unwrap();
        assert!(is_alert_active(&open));
    }

    #[test]
    fn test_alert_view_with_unknown_severity() {
        let alert = Alert::try_from(raw(json!({
            "id": 5, "alert_type": "Idle Equipment", "severity": "catastrophic",
            "title": "Idle", "created_at": "2024-03-01"
        })))
        .unwrap();

        let view = AlertView::classify(alert, &ClassifierRules::default());
        assert_eq!(view.icon, IconKind::Info);
        assert_eq!(view.color, "gray");
        assert_eq!(view.severity, Severity::Medium);
        assert_eq!(view.category, AlertCategory::IdleEquipment);
        assert!(view.is_active);
    }

    #[test]
    fn test_create_request_from_draft() {
        let draft = AlertDraft {
            equipment_id: Some(7),
            rental_id: None,
            category: AlertCategory::LowUtilization,
            severity: Severity::Low,
            title: "Low utilization on EQX1007".to_string(),
            message: "Excavator utilization is 20.0%".to_string(),
        };
        let json = serde_json::to_value(CreateAlertRequest::from(&draft)).unwrap();
        assert_eq!(json["alert_type"], "Low Utilization");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["resolved"], false);
        assert!(json.get("rental_id").is_none());
    }
}
