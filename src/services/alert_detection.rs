//! Detección de alertas
//!
//! Genera borradores de alerta a partir del snapshot actual. Nunca duplica
//! una alerta abierta de la misma categoría para el mismo alquiler o equipo.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::models::{
    Alert, AlertCategory, AlertDraft, Equipment, Rental, RentalStatus, UsageLog,
};
use crate::services::alert_classifier::{classify_severity, AlertContext, ClassifierRules};
use crate::services::status_resolver::{days_overdue, is_alert_active, resolve_rental_status};

/// Ralentí por encima de este múltiplo de horas de motor es anómalo
pub const IDLE_RATIO_THRESHOLD: f64 = 1.5;

/// Utilización (motor / total) por debajo de este porcentaje se reporta
pub const LOW_UTILIZATION_PERCENT: f64 = 30.0;

/// Solo cuentan los registros de uso de los últimos días
pub const USAGE_LOOKBACK_DAYS: i64 = 7;

/// Pares (id, categoría) que ya tienen una alerta abierta
fn open_keys<F>(alerts: &[Alert], rules: &ClassifierRules, key: F) -> HashSet<(i64, AlertCategory)>
where
    F: Fn(&Alert) -> Option<i64>,
{
    alerts
        .iter()
        .filter(|a| is_alert_active(a))
        .filter_map(|a| key(a).map(|id| (id, AlertCategory::from_type(&a.alert_type, rules))))
        .collect()
}

/// Un borrador por alquiler vencido sin alerta `OverdueReturn` abierta
pub fn detect_overdue_alerts(
    rentals: &[Rental],
    alerts: &[Alert],
    now: DateTime<Utc>,
    rules: &ClassifierRules,
) -> Vec<AlertDraft> {
    let open = open_keys(alerts, rules, |a| a.rental_id);
    let category = AlertCategory::OverdueReturn;

    rentals
        .iter()
        .filter(|r| resolve_rental_status(r, now) == RentalStatus::Overdue)
        .filter(|r| {
            let exists = open.contains(&(r.id, category));
            if exists {
                debug!("Alquiler {} ya tiene alerta de retraso abierta", r.rental_ref);
            }
            !exists
        })
        .map(|r| {
            let days = days_overdue(r, now);
            let context = AlertContext {
                days_overdue: Some(days),
                ..Default::default()
            };
            let equipment = r
                .equipment_code
                .clone()
                .unwrap_or_else(|| format!("#{}", r.equipment_id));

            AlertDraft {
                equipment_id: Some(r.equipment_id),
                rental_id: Some(r.id),
                category,
                severity: classify_severity(category.canonical_type(), &context, rules),
                title: format!("Rental {} overdue", r.rental_ref),
                message: format!(
                    "Equipment {} is {} day(s) past its expected return date",
                    equipment, days
                ),
            }
        })
        .collect()
}

/// Borradores por ralentí excesivo y baja utilización
pub fn detect_idle_alerts(
    equipment: &[Equipment],
    alerts: &[Alert],
    rules: &ClassifierRules,
) -> Vec<AlertDraft> {
    let open = open_keys(alerts, rules, |a| a.equipment_id);
    let mut drafts = Vec::new();

    for item in equipment {
        let engine = item.engine_hours_per_day;
        let idle = item.idle_hours_per_day;
        let context = AlertContext {
            engine_hours: Some(engine),
            idle_hours: Some(idle),
            ..Default::default()
        };

        let idle_open = open.contains(&(item.id, AlertCategory::IdleEquipment));
        if idle > engine * IDLE_RATIO_THRESHOLD && !idle_open {
            let category = AlertCategory::IdleEquipment;
            drafts.push(AlertDraft {
                equipment_id: Some(item.id),
                rental_id: None,
                category,
                severity: classify_severity(category.canonical_type(), &context, rules),
                title: format!("Excessive idle time on {}", item.equipment_id),
                message: format!(
                    "{} idles {:.1}h/day against {:.1}h/day of engine time",
                    item.display_name(),
                    idle,
                    engine
                ),
            });
        }

        if let Some(ratio) = item.utilization_ratio() {
            let percent = ratio * 100.0;
            let category = AlertCategory::LowUtilization;
            if percent < LOW_UTILIZATION_PERCENT && !open.contains(&(item.id, category)) {
                let context = AlertContext::default();
                drafts.push(AlertDraft {
                    equipment_id: Some(item.id),
                    rental_id: None,
                    category,
                    severity: classify_severity(category.canonical_type(), &context, rules),
                    title: format!("Low utilization on {}", item.equipment_id),
                    message: format!("{} utilization is {:.1}%", item.display_name(), percent),
                });
            }
        }
    }

    drafts
}

/// Un borrador por equipo con registros de uso recientes sobre `threshold_hours`
/// de ralentí. Se reporta el registro con más ralentí.
///
/// `drafted` son los borradores ya generados en la misma pasada; un equipo
/// cubierto ahí por `IdleEquipment` no se repite.
pub fn detect_usage_idle_alerts(
    logs: &[UsageLog],
    alerts: &[Alert],
    drafted: &[AlertDraft],
    now: DateTime<Utc>,
    threshold_hours: f64,
    rules: &ClassifierRules,
) -> Vec<AlertDraft> {
    let category = AlertCategory::IdleEquipment;
    let mut covered = open_keys(alerts, rules, |a| a.equipment_id);
    covered.extend(
        drafted
            .iter()
            .filter_map(|d| d.equipment_id.map(|id| (id, d.category))),
    );
    let since = now - Duration::days(USAGE_LOOKBACK_DAYS);

    let mut worst: BTreeMap<i64, &UsageLog> = BTreeMap::new();
    for log in logs
        .iter()
        .filter(|log| log.date >= since && log.idle_hours > threshold_hours)
    {
        let entry = worst.entry(log.equipment_id).or_insert(log);
        if log.idle_hours > entry.idle_hours {
            *entry = log;
        }
    }

    worst
        .into_values()
        .filter(|log| {
            let exists = covered.contains(&(log.equipment_id, category));
            if exists {
                debug!("Equipo {} ya cubierto por alerta de ralentí", log.equipment_id);
            }
            !exists
        })
        .map(|log| {
            let context = AlertContext {
                engine_hours: Some(log.engine_hours),
                idle_hours: Some(log.idle_hours),
                ..Default::default()
            };
            AlertDraft {
                equipment_id: Some(log.equipment_id),
                rental_id: Some(log.rental_id),
                category,
                severity: classify_severity(category.canonical_type(), &context, rules),
                title: format!("Excessive idle time detected on equipment #{}", log.equipment_id),
                message: format!(
                    "Equipment has {:.1} idle hours on {}",
                    log.idle_hours,
                    log.date.date_naive()
                ),
            }
        })
        .collect()
}
