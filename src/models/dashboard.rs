//! Modelos del dashboard
//!
//! Vistas derivadas, nunca persistidas por el núcleo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::alert::Alert;

/// Origen del resumen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    Local,
    Upstream,
}

/// Conteo de equipos por estado almacenado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub total: usize,
    pub available: usize,
    pub rented: usize,
    pub maintenance: usize,
    pub out_of_service: usize,
    /// Estados fuera del enum: cuentan en `total` pero en ningún bucket
    pub unrecognized: usize,
    pub utilization_rate: f64,
}

/// Conteo de alquileres por estado visible
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalSummary {
    pub active: usize,
    pub overdue: usize,
    pub completed: usize,
    /// Informativo: excluidos de los tres buckets anteriores
    pub cancelled: usize,
    pub total_revenue: Decimal,
}

/// Resumen para dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub equipment_summary: EquipmentSummary,
    pub rental_summary: RentalSummary,
    /// Todas las alertas sin resolver, más recientes primero
    pub unresolved_alerts: Vec<Alert>,
    /// Ventana truncada de `unresolved_alerts`
    pub recent_alerts: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
    pub source: SummarySource,
}

/// Estadísticas por tipo de equipo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentTypeStats {
    pub equipment_type: String,
    pub count: usize,
    pub utilization: f64,
}
