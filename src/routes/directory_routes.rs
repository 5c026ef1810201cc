use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::directory_controller::DirectoryController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::directory_dto::{
    CreateOperatorRequest, CreateSiteRequest, UpdateOperatorRequest, UpdateSiteRequest,
};
use crate::models::{Operator, Site};
use crate::state::AppState;
use crate::utils::errors::AppError;

// Query de búsqueda para obras y operadores
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

pub fn create_site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sites))
        .route("/", post(create_site))
        .route("/:id", get(get_site))
        .route("/:id", put(update_site))
}

pub fn create_operator_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_operators))
        .route("/", post(create_operator))
        .route("/:id", get(get_operator))
        .route("/:id", put(update_operator))
}

async fn list_sites(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<Site>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.list_sites(query.search).await?;
    Ok(Json(response))
}

async fn get_site(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Site>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.get_site(id).await?;
    Ok(Json(response))
}

async fn create_site(
    State(state): State<AppState>,
    Json(request): Json<CreateSiteRequest>,
) -> Result<Json<ApiResponse<Site>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.create_site(request).await?;
    Ok(Json(response))
}

async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSiteRequest>,
) -> Result<Json<ApiResponse<Site>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.update_site(id, request).await?;
    Ok(Json(response))
}

async fn list_operators(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<Operator>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.list_operators(query.search).await?;
    Ok(Json(response))
}

async fn get_operator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Operator>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.get_operator(id).await?;
    Ok(Json(response))
}

async fn create_operator(
    State(state): State<AppState>,
    Json(request): Json<CreateOperatorRequest>,
) -> Result<Json<ApiResponse<Operator>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.create_operator(request).await?;
    Ok(Json(response))
}

async fn update_operator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOperatorRequest>,
) -> Result<Json<ApiResponse<Operator>>, AppError> {
    let controller = DirectoryController::new(state);
    let response = controller.update_operator(id, request).await?;
    Ok(Json(response))
}
