use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::usage_controller::UsageController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::usage_dto::CreateUsageLogRequest;
use crate::models::{UsageLog, UsageScope};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_usage_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_usage_log))
        .route("/rental/:id", get(list_by_rental))
        .route("/equipment/:id", get(list_by_equipment))
}

async fn list_by_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ListResponse<UsageLog>>, AppError> {
    let controller = UsageController::new(state);
    let response = controller.list(UsageScope::Rental(id)).await?;
    Ok(Json(response))
}

async fn list_by_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ListResponse<UsageLog>>, AppError> {
    let controller = UsageController::new(state);
    let response = controller.list(UsageScope::Equipment(id)).await?;
    Ok(Json(response))
}

async fn create_usage_log(
    State(state): State<AppState>,
    Json(request): Json<CreateUsageLogRequest>,
) -> Result<Json<ApiResponse<UsageLog>>, AppError> {
    let controller = UsageController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}
