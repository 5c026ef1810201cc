use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::equipment_controller::EquipmentController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::equipment_dto::{CreateEquipmentRequest, UpdateEquipmentRequest};
use crate::models::Equipment;
use crate::services::filters::EquipmentFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_equipment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment))
        .route("/", post(create_equipment))
        .route("/:id", get(get_equipment))
        .route("/:id", put(update_equipment))
}

async fn list_equipment(
    State(state): State<AppState>,
    Query(filter): Query<EquipmentFilter>,
) -> Result<Json<ListResponse<Equipment>>, AppError> {
    let controller = EquipmentController::new(state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Equipment>, AppError> {
    let controller = EquipmentController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_equipment(
    State(state): State<AppState>,
    Json(request): Json<CreateEquipmentRequest>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let controller = EquipmentController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEquipmentRequest>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let controller = EquipmentController::new(state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}
