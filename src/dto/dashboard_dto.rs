use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Alert, DashboardSummary, EquipmentSummary, EquipmentTypeStats, RentalSummary, SummarySource,
};
use crate::services::aggregator::unresolved_alerts;
use crate::utils::errors::{field_error, validation_error, AppError};
use crate::utils::validation::parse_money;

// Resumen calculado por el backend (`GET /dashboard/summary`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawEquipmentSummary {
    pub total_equipment: usize,
    pub available: usize,
    pub rented: usize,
    pub maintenance: usize,
    #[serde(default)]
    pub out_of_service: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRentalSummary {
    /// Incluye los vencidos: el backend cuenta por estado almacenado
    pub active_rentals: usize,
    pub overdue_rentals: usize,
    pub completed_rentals: Option<usize>,
    pub total_revenue: f64,
}

/// `recent_alerts` del backend se ignora: solo trae las 5 más recientes
#[derive(Debug, Clone, Deserialize)]
pub struct RawDashboardSummary {
    pub equipment_summary: RawEquipmentSummary,
    pub rental_summary: RawRentalSummary,
}

impl RawDashboardSummary {
    /// `true` si el backend no informa alquileres completados
    pub fn needs_local_rentals(&self) -> bool {
        self.rental_summary.completed_rentals.is_none()
    }

    /// Convierte el resumen remoto al modelo local fechado en `now`.
    ///
    /// Las alertas abiertas salen del listado completo `alerts`. Los
    /// completados y cancelados que el backend no informa se toman de
    /// `local_rentals`.
    pub fn into_summary(
        self,
        alerts: &[Alert],
        local_rentals: Option<&RentalSummary>,
        now: DateTime<Utc>,
        recent_window: usize,
    ) -> Result<DashboardSummary, AppError> {
        let eq = self.equipment_summary;
        let bucketed = eq.available + eq.rented + eq.maintenance + eq.out_of_service;
        let utilization_rate = if eq.total_equipment > 0 {
            (eq.rented as f64 / eq.total_equipment as f64 * 10000.0).round() / 100.0
        } else {
            0.0
        };

        let rentals = self.rental_summary;
        let completed = match (rentals.completed_rentals, local_rentals) {
            (Some(completed), _) => completed,
            (None, Some(local)) => local.completed,
            (None, None) => {
                return Err(validation_error(
                    "completed_rentals",
                    "upstream summary does not report completed rentals",
                ))
            }
        };

        let unresolved = unresolved_alerts(alerts);
        let recent = unresolved.iter().take(recent_window).cloned().collect();

        Ok(DashboardSummary {
            equipment_summary: EquipmentSummary {
                total: eq.total_equipment,
                available: eq.available,
                rented: eq.rented,
                maintenance: eq.maintenance,
                out_of_service: eq.out_of_service,
                unrecognized: eq.total_equipment.saturating_sub(bucketed),
                utilization_rate,
            },
            rental_summary: RentalSummary {
                active: rentals.active_rentals.saturating_sub(rentals.overdue_rentals),
                overdue: rentals.overdue_rentals,
                completed,
                cancelled: local_rentals.map_or(0, |local| local.cancelled),
                total_revenue: parse_money(rentals.total_revenue)
                    .map_err(|e| field_error("total_revenue", e))?,
            },
            unresolved_alerts: unresolved,
            recent_alerts: recent,
            generated_at: now,
            source: SummarySource::Upstream,
        })
    }
}

// Response del dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub stale: bool,
    /// Elementos del backend omitidos por payload inválido
    pub skipped: usize,
}

// Response del desglose por tipo
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentTypesResponse {
    pub types: Vec<EquipmentTypeStats>,
    pub stale: bool,
}
