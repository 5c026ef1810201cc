use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::{DashboardResponse, EquipmentTypesResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/equipment-types", get(get_equipment_types))
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let controller = DashboardController::new(state);
    let response = controller.summary().await?;
    Ok(Json(response))
}

async fn get_equipment_types(
    State(state): State<AppState>,
) -> Result<Json<EquipmentTypesResponse>, AppError> {
    let controller = DashboardController::new(state);
    let response = controller.equipment_types().await?;
    Ok(Json(response))
}
