use tracing::{info, warn};

use crate::controllers::fetch_or_cached;
use crate::dto::dashboard_dto::{DashboardResponse, EquipmentTypesResponse};
use crate::models::SummarySource;
use crate::services::aggregator::{equipment_type_breakdown, summarize, summarize_rentals};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    state: AppState,
}

impl DashboardController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn summary(&self) -> AppResult<DashboardResponse> {
        let now = self.state.now();
        let window = self.state.config.recent_alerts_window;

        if self.state.config.summary_source == SummarySource::Upstream {
            match self.upstream_summary().await {
                Ok(response) => return Ok(response),
                Err(e) => warn!("⚠️ Resumen remoto no utilizable, agregando localmente: {}", e),
            }
        }

        let state = &self.state;
        let page = state.page();
        let (equipment, rentals, alerts) = futures::try_join!(
            fetch_or_cached(&state.cache.equipment, now, state.api.list_equipment(page)),
            fetch_or_cached(&state.cache.rentals, now, state.api.list_rentals(page, None)),
            fetch_or_cached(&state.cache.alerts, now, state.api.list_alerts(page, None)),
        )?;

        let summary = summarize(&equipment.items, &rentals.items, &alerts.items, now, window);
        info!(
            "📊 Resumen: {} equipos, {} alquileres activos, {} alertas abiertas",
            summary.equipment_summary.total,
            summary.rental_summary.active,
            summary.unresolved_alerts.len()
        );

        Ok(DashboardResponse {
            summary,
            stale: equipment.stale || rentals.stale || alerts.stale,
            skipped: equipment.skipped + rentals.skipped + alerts.skipped,
        })
    }

    /// Conteos del backend; alertas abiertas y completados salen de los listados
    async fn upstream_summary(&self) -> AppResult<DashboardResponse> {
        let state = &self.state;
        let now = state.now();
        let page = state.page();

        let raw = state.api.fetch_dashboard_summary().await?;
        let alerts =
            fetch_or_cached(&state.cache.alerts, now, state.api.list_alerts(page, None)).await?;
        let rentals = if raw.needs_local_rentals() {
            let fetch = state.api.list_rentals(page, None);
            Some(fetch_or_cached(&state.cache.rentals, now, fetch).await?)
        } else {
            None
        };

        let local = rentals.as_ref().map(|r| summarize_rentals(&r.items, now));
        let summary = raw.into_summary(
            &alerts.items,
            local.as_ref(),
            now,
            state.config.recent_alerts_window,
        )?;
        info!(
            "📊 Resumen remoto: {} equipos, {} alertas abiertas",
            summary.equipment_summary.total,
            summary.unresolved_alerts.len()
        );

        let (rentals_stale, rentals_skipped) = rentals.map_or((false, 0), |r| (r.stale, r.skipped));
        Ok(DashboardResponse {
            summary,
            stale: alerts.stale || rentals_stale,
            skipped: alerts.skipped + rentals_skipped,
        })
    }

    pub async fn equipment_types(&self) -> AppResult<EquipmentTypesResponse> {
        let now = self.state.now();
        let equipment = fetch_or_cached(
            &self.state.cache.equipment,
            now,
            self.state.api.list_equipment(self.state.page()),
        )
        .await?;

        Ok(EquipmentTypesResponse {
            types: equipment_type_breakdown(&equipment.items),
            stale: equipment.stale,
        })
    }
}
