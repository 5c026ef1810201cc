use tracing::{info, warn};
use validator::Validate;

use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::usage_dto::CreateUsageLogRequest;
use crate::models::{UsageLog, UsageScope};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct UsageController {
    state: AppState,
}

impl UsageController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Registros de un alquiler o equipo, más recientes primero. Sin snapshot.
    pub async fn list(&self, scope: UsageScope) -> AppResult<ListResponse<UsageLog>> {
        let batch = self.state.api.list_usage_logs(scope).await?;

        let mut items = batch.items;
        items.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(ListResponse::new(items, false, Some(self.state.now())).with_skipped(batch.skipped))
    }

    pub async fn create(&self, request: CreateUsageLogRequest) -> AppResult<ApiResponse<UsageLog>> {
        request.validate().map_err(AppError::Validation)?;

        let log = self.state.api.create_usage_log(&request).await?;
        info!("✅ Registro de uso {} creado para el alquiler {}", log.id, log.rental_id);
        if log.idle_hours > self.state.config.idle_hours_threshold {
            warn!(
                "⚠️ Equipo {} registró {:.1}h de ralentí",
                log.equipment_id, log.idle_hours
            );
        }

        Ok(ApiResponse::success_with_message(
            log,
            "Usage log created successfully".to_string(),
        ))
    }
}
