use tracing::{error, info};
use validator::Validate;

use crate::controllers::fetch_or_cached;
use crate::dto::alert_dto::{AlertView, DetectionReport, ResolveAlertRequest};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::services::alert_classifier::{resolve_alert, ResolvedAlert};
use crate::models::{Equipment, UsageLog, UsageScope};
use crate::services::alert_detection::{
    detect_idle_alerts, detect_overdue_alerts, detect_usage_idle_alerts,
};
use crate::services::filters::AlertFilter;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct AlertController {
    state: AppState,
}

impl AlertController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, filter: AlertFilter) -> AppResult<ListResponse<AlertView>> {
        let rules = self.state.rules.as_ref();
        filter.criteria(rules)?;

        let now = self.state.now();
        let fetched = fetch_or_cached(
            &self.state.cache.alerts,
            now,
            self.state.api.list_alerts(self.state.page(), None),
        )
        .await?;

        let mut items: Vec<AlertView> = filter
            .apply(&fetched.items, rules)?
            .into_iter()
            .cloned()
            .map(|alert| AlertView::classify(alert, rules))
            .collect();
        items.sort_by(|a, b| {
            b.alert
                .created_at
                .cmp(&a.alert.created_at)
                .then(b.alert.id.cmp(&a.alert.id))
        });

        Ok(fetched.respond_with(items))
    }

    /// Resuelve una alerta. Se relee del backend para detectar dobles resoluciones.
    pub async fn resolve(
        &self,
        id: i64,
        request: ResolveAlertRequest,
    ) -> AppResult<ApiResponse<ResolvedAlert>> {
        request.validate().map_err(AppError::Validation)?;

        let now = self.state.now();
        let current = self.state.api.get_alert(id).await?;
        let resolved = resolve_alert(&current, &request.resolved_by, now)?;

        self.state.api.resolve_alert(id, &resolved.resolved_by).await?;
        self.state.cache.alerts.upsert(resolved.alert.clone()).await;
        info!("✅ Alerta {} resuelta por {}", id, resolved.resolved_by);

        Ok(ApiResponse::success_with_message(
            resolved,
            "Alert resolved successfully".to_string(),
        ))
    }

    /// Detecta y crea alertas nuevas. Necesita datos frescos: sin fallback al cache.
    pub async fn detect(&self) -> AppResult<DetectionReport> {
        let now = self.state.now();
        let page = self.state.page();
        let rules = self.state.rules.as_ref();

        let (equipment, rentals, alerts) = futures::try_join!(
            self.state.api.list_equipment(page),
            self.state.api.list_rentals(page, None),
            self.state.api.list_alerts(page, None),
        )?;
        let usage_logs = self.usage_logs_for(&equipment.items).await?;

        let overdue = detect_overdue_alerts(&rentals.items, &alerts.items, now, rules);
        let idle = detect_idle_alerts(&equipment.items, &alerts.items, rules);
        let usage = detect_usage_idle_alerts(
            &usage_logs,
            &alerts.items,
            &idle,
            now,
            self.state.config.idle_hours_threshold,
            rules,
        );
        let overdue_candidates = overdue.len();
        let equipment_candidates = idle.len();
        let usage_candidates = usage.len();

        let mut created = Vec::new();
        let mut failed = 0;
        for draft in overdue.iter().chain(idle.iter()).chain(usage.iter()) {
            match self.state.api.create_alert(draft).await {
                Ok(alert) => {
                    self.state.cache.alerts.upsert(alert.clone()).await;
                    created.push(AlertView::classify(alert, rules));
                }
                Err(e) => {
                    error!("❌ No se pudo crear la alerta '{}': {}", draft.title, e);
                    failed += 1;
                }
            }
        }

        info!(
            "🔎 Detección: {} alertas creadas ({} retrasos, {} equipos, {} uso), {} fallidas",
            created.len(),
            overdue_candidates,
            equipment_candidates,
            usage_candidates,
            failed
        );

        Ok(DetectionReport {
            created,
            overdue_candidates,
            equipment_candidates,
            usage_candidates,
            failed,
            detected_at: now,
        })
    }

    /// Registros de uso de toda la flota, consultados por equipo
    async fn usage_logs_for(&self, equipment: &[Equipment]) -> AppResult<Vec<UsageLog>> {
        let batches = futures::future::try_join_all(
            equipment
                .iter()
                .map(|item| self.state.api.list_usage_logs(UsageScope::Equipment(item.id))),
        )
        .await?;
        Ok(batches.into_iter().flat_map(|batch| batch.items).collect())
    }
}
