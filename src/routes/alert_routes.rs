use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::alert_controller::AlertController;
use crate::dto::alert_dto::{AlertView, DetectionReport, ResolveAlertRequest};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::services::alert_classifier::ResolvedAlert;
use crate::services::filters::AlertFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/detect", post(detect_alerts))
        .route("/:id/resolve", post(resolve_alert))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<ListResponse<AlertView>>, AppError> {
    let controller = AlertController::new(state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ResolveAlertRequest>,
) -> Result<Json<ApiResponse<ResolvedAlert>>, AppError> {
    let controller = AlertController::new(state);
    let response = controller.resolve(id, request).await?;
    Ok(Json(response))
}

async fn detect_alerts(State(state): State<AppState>) -> Result<Json<DetectionReport>, AppError> {
    let controller = AlertController::new(state);
    let response = controller.detect().await?;
    Ok(Json(response))
}
