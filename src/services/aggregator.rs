//! Agregación del dashboard
//!
//! Pliega las colecciones de equipos, alquileres y alertas en los conteos
//! que consume el dashboard. Funciones puras: mismo snapshot y mismo `now`,
//! mismo resumen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{
    Alert, DashboardSummary, Equipment, EquipmentStatus, EquipmentSummary, EquipmentTypeStats,
    Rental, RentalStatus, RentalSummary, SummarySource,
};
use crate::services::status_resolver::{is_alert_active, resolve_rental_status};

/// Ventana de alertas recientes en la vista de resumen
pub const DEFAULT_RECENT_WINDOW: usize = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Conteo por estado almacenado (no se re-deriva)
pub fn summarize_equipment(equipment: &[Equipment]) -> EquipmentSummary {
    let mut summary = EquipmentSummary {
        total: equipment.len(),
        ..Default::default()
    };

    for item in equipment {
        match &item.status {
            EquipmentStatus::Available => summary.available += 1,
            EquipmentStatus::Rented => summary.rented += 1,
            EquipmentStatus::Maintenance => summary.maintenance += 1,
            EquipmentStatus::OutOfService => summary.out_of_service += 1,
            EquipmentStatus::Unrecognized(raw) => {
                warn!(
                    "⚠️ Equipo {} con estado no reconocido '{}'",
                    item.equipment_id, raw
                );
                summary.unrecognized += 1;
            }
        }
    }

    if summary.total > 0 {
        summary.utilization_rate = round2(summary.rented as f64 / summary.total as f64 * 100.0);
    }

    summary
}

/// Conteo por estado visible; los cancelados quedan fuera de los tres buckets
pub fn summarize_rentals(rentals: &[Rental], now: DateTime<Utc>) -> RentalSummary {
    let mut summary = RentalSummary::default();

    for rental in rentals {
        match resolve_rental_status(rental, now) {
            RentalStatus::Active => summary.active += 1,
            RentalStatus::Overdue => summary.overdue += 1,
            RentalStatus::Completed => {
                summary.completed += 1;
                summary.total_revenue += rental.total_cost.unwrap_or(Decimal::ZERO);
            }
            RentalStatus::Cancelled => summary.cancelled += 1,
        }
    }

    summary
}

/// Alertas sin resolver, más recientes primero (empate: id mayor primero)
pub fn unresolved_alerts(alerts: &[Alert]) -> Vec<Alert> {
    let mut unresolved: Vec<Alert> =
        alerts.iter().filter(|a| is_alert_active(a)).cloned().collect();
    unresolved.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    unresolved
}

/// Resumen completo del dashboard
pub fn summarize(
    equipment: &[Equipment],
    rentals: &[Rental],
    alerts: &[Alert],
    now: DateTime<Utc>,
    recent_window: usize,
) -> DashboardSummary {
    let unresolved = unresolved_alerts(alerts);
    let recent = unresolved.iter().take(recent_window).cloned().collect();

    DashboardSummary {
        equipment_summary: summarize_equipment(equipment),
        rental_summary: summarize_rentals(rentals, now),
        unresolved_alerts: unresolved,
        recent_alerts: recent,
        generated_at: now,
        source: SummarySource::Local,
    }
}

/// Conteo y utilización (motor / (motor + ralentí)) por tipo de equipo
pub fn equipment_type_breakdown(equipment: &[Equipment]) -> Vec<EquipmentTypeStats> {
    let mut by_type: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();

    for item in equipment {
        let entry = by_type
            .entry(item.equipment_type.trim().to_lowercase())
            .or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += item.engine_hours_per_day;
        entry.2 += item.idle_hours_per_day;
    }

    by_type
        .into_iter()
        .map(|(equipment_type, (count, engine, idle))| EquipmentTypeStats {
            equipment_type,
            count,
            utilization: if engine + idle > 0.0 {
                round2(engine / (engine + idle) * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let now = Utc::now();
        let summary = summarize(&[], &[], &[], now, DEFAULT_RECENT_WINDOW);
        assert_eq!(summary.equipment_summary, EquipmentSummary::default());
        assert_eq!(summary.rental_summary, RentalSummary::default());
        assert!(summary.recent_alerts.is_empty());
        assert_eq!(summary.generated_at, now);
        assert!(equipment_type_breakdown(&[]).is_empty());
    }
}
