use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::rental_controller::{CheckInResponse, RentalController};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::rental_dto::{
    CreateRentalRequest, DueSoonQuery, ExtendRentalRequest, RentalView, UpdateRentalRequest,
};
use crate::services::filters::RentalFilter;
use crate::services::rental_billing::{DueSoon, OverdueNotice};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals))
        .route("/", post(create_rental))
        .route("/due-soon", get(list_due_soon))
        .route("/overdue", get(list_overdue))
        .route("/:id", get(get_rental))
        .route("/:id", put(update_rental))
        .route("/:id/checkin", post(check_in_rental))
        .route("/:id/extend", post(extend_rental))
}

async fn list_rentals(
    State(state): State<AppState>,
    Query(filter): Query<RentalFilter>,
) -> Result<Json<ListResponse<RentalView>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RentalView>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_rental(
    State(state): State<AppState>,
    Json(request): Json<CreateRentalRequest>,
) -> Result<Json<ApiResponse<RentalView>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRentalRequest>,
) -> Result<Json<ApiResponse<RentalView>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn check_in_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CheckInResponse>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.check_in(id).await?;
    Ok(Json(response))
}

async fn extend_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ExtendRentalRequest>,
) -> Result<Json<ApiResponse<RentalView>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.extend(id, request).await?;
    Ok(Json(response))
}

async fn list_due_soon(
    State(state): State<AppState>,
    Query(query): Query<DueSoonQuery>,
) -> Result<Json<ListResponse<DueSoon>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.due_soon(query.days).await?;
    Ok(Json(response))
}

async fn list_overdue(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<OverdueNotice>>, AppError> {
    let controller = RentalController::new(state);
    let response = controller.overdue().await?;
    Ok(Json(response))
}
