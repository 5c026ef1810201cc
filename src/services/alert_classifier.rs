//! Clasificación de alertas
//!
//! Asigna categoría, severidad e icono a cada alerta y valida las
//! resoluciones antes de enviarlas al backend. La clasificación es total:
//! un tipo desconocido cae en `Uncategorized` con severidad baja.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::models::{Alert, AlertCategory, Resolution, Severity};
use crate::services::status_resolver::is_alert_active;
use crate::utils::errors::{invalid_operation_error, validation_error, AppResult};

/// Tabla de reglas configurable
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    aliases: HashMap<String, AlertCategory>,
    severities: HashMap<AlertCategory, Severity>,
    type_overrides: HashMap<String, Severity>,
    /// Días de retraso a partir de los cuales la alerta sube a `high`
    pub escalation_days: i64,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        let aliases = [
            ("overdue return", AlertCategory::OverdueReturn),
            ("overdue", AlertCategory::OverdueReturn),
            ("rental overdue", AlertCategory::OverdueReturn),
            ("idle equipment", AlertCategory::IdleEquipment),
            ("anomaly", AlertCategory::IdleEquipment),
            ("high_idle_time", AlertCategory::IdleEquipment),
            ("excessive idle time", AlertCategory::IdleEquipment),
            ("low utilization", AlertCategory::LowUtilization),
            ("low_utilization", AlertCategory::LowUtilization),
            ("maintenance due", AlertCategory::MaintenanceDue),
            ("maintenance", AlertCategory::MaintenanceDue),
        ]
        .into_iter()
        .map(|(alias, category)| (alias.to_string(), category))
        .collect();

        let severities = [
            (AlertCategory::OverdueReturn, Severity::High),
            (AlertCategory::IdleEquipment, Severity::Medium),
            (AlertCategory::LowUtilization, Severity::Low),
            (AlertCategory::MaintenanceDue, Severity::Low),
            (AlertCategory::Uncategorized, Severity::Low),
        ]
        .into_iter()
        .collect();

        Self {
            aliases,
            severities,
            type_overrides: HashMap::new(),
            escalation_days: 7,
        }
    }
}

fn normalize_type(alert_type: &str) -> String {
    alert_type.trim().to_lowercase()
}

impl ClassifierRules {
    /// Reglas por defecto más overrides "tipo=severidad,tipo=severidad"
    pub fn with_overrides(overrides: &str) -> Result<Self> {
        let mut rules = Self::default();
        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (alert_type, severity) = entry.split_once('=').ok_or_else(|| {
                anyhow!("invalid severity rule '{}', expected type=severity", entry)
            })?;
            let alert_type = normalize_type(alert_type);
            if alert_type.is_empty() {
                return Err(anyhow!("invalid severity rule '{}': empty alert type", entry));
            }
            let severity: Severity = severity.parse().map_err(|e: String| anyhow!(e))?;
            rules.type_overrides.insert(alert_type, severity);
        }
        Ok(rules)
    }

    pub fn with_escalation_days(mut self, days: i64) -> Self {
        self.escalation_days = days;
        self
    }

    /// Categoría de un tipo libre (coincidencia exacta sin mayúsculas)
    pub fn category_of(&self, alert_type: &str) -> AlertCategory {
        let key = normalize_type(alert_type);
        match self.aliases.get(&key) {
            Some(category) => *category,
            None => {
                let canonical = AlertCategory::ALL
                    .iter()
                    .find(|c| normalize_type(c.canonical_type()) == key)
                    .copied();
                canonical.unwrap_or_else(|| {
                    warn!("⚠️ Tipo de alerta sin categoría: '{}'", alert_type);
                    AlertCategory::Uncategorized
                })
            }
        }
    }

    fn base_severity(&self, alert_type: &str, category: AlertCategory) -> Severity {
        self.type_overrides
            .get(&normalize_type(alert_type))
            .or_else(|| self.severities.get(&category))
            .copied()
            .unwrap_or(Severity::Low)
    }
}

impl AlertCategory {
    pub fn from_type(alert_type: &str, rules: &ClassifierRules) -> Self {
        rules.category_of(alert_type)
    }
}

/// Urgencia calculada que puede elevar la severidad base
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertContext {
    pub days_overdue: Option<i64>,
    pub days_until_due: Option<i64>,
    pub engine_hours: Option<f64>,
    pub idle_hours: Option<f64>,
}

fn urgency(context: &AlertContext, escalation_days: i64) -> Severity {
    let mut level = Severity::Low;

    if let Some(days) = context.days_overdue {
        if days > escalation_days {
            level = level.max(Severity::High);
        } else if days > 0 {
            level = level.max(Severity::Medium);
        }
    }

    if let (Some(engine), Some(idle)) = (context.engine_hours, context.idle_hours) {
        if engine + idle > 0.0 {
            if idle > engine * 2.0 {
                level = level.max(Severity::High);
            } else if idle > engine * 1.5 {
                level = level.max(Severity::Medium);
            }
        }
    }

    if matches!(context.days_until_due, Some(days) if days <= 0) {
        level = level.max(Severity::Medium);
    }

    level
}

/// Severidad de un tipo de alerta en un contexto. Nunca falla.
pub fn classify_severity(
    alert_type: &str,
    context: &AlertContext,
    rules: &ClassifierRules,
) -> Severity {
    let category = rules.category_of(alert_type);
    rules
        .base_severity(alert_type, category)
        .max(urgency(context, rules.escalation_days))
}

/// Severidad declarada por el backend o, si no es reconocible, la clasificada
pub fn effective_severity(alert: &Alert, rules: &ClassifierRules) -> Severity {
    match alert.severity() {
        Some(severity) => severity,
        None => {
            warn!(
                "⚠️ Severidad desconocida '{}' en alerta {}, clasificando por tipo",
                alert.severity_label, alert.id
            );
            classify_severity(&alert.alert_type, &AlertContext::default(), rules)
        }
    }
}

/// Icono de presentación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Critical,
    Warning,
    Notice,
    Info,
}

impl IconKind {
    pub fn color(&self) -> &'static str {
        match self {
            IconKind::Critical => "red",
            IconKind::Warning => "amber",
            IconKind::Notice => "blue",
            IconKind::Info => "gray",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            IconKind::Critical => "alert-octagon",
            IconKind::Warning => "alert-triangle",
            IconKind::Notice => "bell",
            IconKind::Info => "info",
        }
    }
}

pub fn icon_for(severity: Severity) -> IconKind {
    match severity {
        Severity::High => IconKind::Critical,
        Severity::Medium => IconKind::Warning,
        Severity::Low => IconKind::Notice,
    }
}

/// Icono para un string de severidad cualquiera; `Info` si no se reconoce
pub fn icon_for_label(label: &str) -> IconKind {
    label.parse::<Severity>().map(icon_for).unwrap_or(IconKind::Info)
}

/// Resolución validada, lista para enviar al backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAlert {
    pub alert_id: i64,
    pub resolved_by: String,
    pub resolved_at: DateTime<Utc>,
    /// Copia de la alerta con la resolución aplicada
    pub alert: Alert,
}

/// Validar y preparar la resolución de una alerta. No modifica `alert`.
pub fn resolve_alert(
    alert: &Alert,
    resolved_by: &str,
    now: DateTime<Utc>,
) -> AppResult<ResolvedAlert> {
    let resolved_by = resolved_by.trim();
    if resolved_by.is_empty() {
        return Err(validation_error("resolved_by", "resolved_by must not be empty"));
    }

    if !is_alert_active(alert) {
        return Err(invalid_operation_error(
            "resolve alert",
            &format!(
                "alert {} was already resolved by {}",
                alert.id,
                alert.resolved_by().unwrap_or("unknown")
            ),
        ));
    }

    let mut resolved = alert.clone();
    resolved.resolution = Resolution::Resolved {
        by: resolved_by.to_string(),
        at: now,
    };

    Ok(ResolvedAlert {
        alert_id: alert.id,
        resolved_by: resolved_by.to_string(),
        resolved_at: now,
        alert: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use chrono::TimeZone;

    fn alert(alert_type: &str, severity: &str) -> Alert {
        Alert {
            id: 5,
            equipment_id: Some(1),
            rental_id: None,
            alert_type: alert_type.to_string(),
            title: "Excessive Idle Time Detected".to_string(),
            message: "Equipment idle for 9h".to_string(),
            severity_label: severity.to_string(),
            resolution: Resolution::Unresolved,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_category_matching_is_case_insensitive() {
        let rules = ClassifierRules::default();
        assert_eq!(rules.category_of("Overdue Return"), AlertCategory::OverdueReturn);
        assert_eq!(rules.category_of("  IDLE EQUIPMENT "), AlertCategory::IdleEquipment);
        assert_eq!(rules.category_of("anomaly"), AlertCategory::IdleEquipment);
        assert_eq!(rules.category_of("Low Utilization"), AlertCategory::LowUtilization);
        assert_eq!(rules.category_of("Fuel Theft"), AlertCategory::Uncategorized);
    }

    #[test]
    fn test_category_from_type_uses_rule_aliases() {
        let rules = ClassifierRules::default();
        let category = |alert_type: &str| AlertCategory::from_type(alert_type, &rules);
        assert_eq!(category("Rental Overdue"), AlertCategory::OverdueReturn);
        assert_eq!(category("high_idle_time"), AlertCategory::IdleEquipment);
        assert_eq!(category("Maintenance"), AlertCategory::MaintenanceDue);
        assert_eq!(category(""), AlertCategory::Uncategorized);
    }

    #[test]
    fn test_default_table() {
        let rules = ClassifierRules::default();
        let ctx = AlertContext::default();
        assert_eq!(classify_severity("overdue return", &ctx, &rules), Severity::High);
        assert_eq!(classify_severity("Idle Equipment", &ctx, &rules), Severity::Medium);
        assert_eq!(classify_severity("maintenance due", &ctx, &rules), Severity::Low);
        assert_eq!(classify_severity("something new", &ctx, &rules), Severity::Low);
    }

    #[test]
    fn test_urgency_only_raises() {
        let rules = ClassifierRules::with_overrides("overdue return=low").unwrap();
        let mild = AlertContext { days_overdue: Some(2), ..Default::default() };
        let severe = AlertContext { days_overdue: Some(8), ..Default::default() };
        assert_eq!(classify_severity("overdue return", &mild, &rules), Severity::Medium);
        assert_eq!(classify_severity("overdue return", &severe, &rules), Severity::High);

        let idle = AlertContext {
            engine_hours: Some(2.0),
            idle_hours: Some(5.0),
            ..Default::default()
        };
        let defaults = ClassifierRules::default();
        assert_eq!(classify_severity("idle equipment", &idle, &defaults), Severity::High);

        let due = AlertContext { days_until_due: Some(0), ..Default::default() };
        assert_eq!(classify_severity("maintenance due", &due, &defaults), Severity::Medium);
    }

    #[test]
    fn test_overrides_parsing() {
        let rules =
            ClassifierRules::with_overrides(" Maintenance Due = high , fuel theft=medium").unwrap();
        let ctx = AlertContext::default();
        assert_eq!(classify_severity("maintenance due", &ctx, &rules), Severity::High);
        assert_eq!(classify_severity("Fuel Theft", &ctx, &rules), Severity::Medium);
        // los alias de la misma categoría no se ven afectados
        assert_eq!(classify_severity("maintenance", &ctx, &rules), Severity::Low);

        assert!(ClassifierRules::with_overrides("overdue").is_err());
        assert!(ClassifierRules::with_overrides("overdue=extreme").is_err());
        assert!(ClassifierRules::with_overrides("=high").is_err());
    }

    #[test]
    fn test_effective_severity_falls_back_to_type() {
        let rules = ClassifierRules::default();
        assert_eq!(effective_severity(&alert("idle equipment", "low"), &rules), Severity::Low);
        assert_eq!(effective_severity(&alert("overdue", "urgent"), &rules), Severity::High);
    }

    #[test]
    fn test_icons() {
        assert_eq!(icon_for(Severity::High), IconKind::Critical);
        assert_eq!(icon_for(Severity::Medium), IconKind::Warning);
        assert_eq!(icon_for(Severity::Low), IconKind::Notice);
        assert_eq!(icon_for_label("Medium"), IconKind::Warning);
        assert_eq!(icon_for_label("catastrophic"), IconKind::Info);
        assert_eq!(icon_for_label(""), IconKind::Info);
        assert_eq!(IconKind::Info.color(), "gray");
    }

    #[test]
    fn test_resolve_alert() {
        let original = alert("idle equipment", "high");
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();

        let resolved = resolve_alert(&original, " Jane ", now).unwrap();
        assert_eq!(resolved.resolved_by, "Jane");
        assert_eq!(resolved.resolved_at, now);
        assert!(!is_alert_active(&resolved.alert));
        assert!(is_alert_active(&original));
    }

    #[test]
    fn test_resolve_alert_rejects_double_resolution() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let resolved = resolve_alert(&alert("overdue", "high"), "Jane", now).unwrap().alert;

        let before = resolved.clone();
        let err = resolve_alert(&resolved, "Bob", now).unwrap_err();
        assert!(matches!(err, AppError::InvalidOperation(_)));
        assert_eq!(resolved, before);
    }

    #[test]
    fn test_resolve_alert_requires_resolver() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let err = resolve_alert(&alert("overdue", "high"), "   ", now).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
