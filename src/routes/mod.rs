pub mod alert_routes;
pub mod dashboard_routes;
pub mod directory_routes;
pub mod equipment_routes;
pub mod rental_routes;
pub mod usage_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::dto::api_response::HealthResponse;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo del gateway, con trazas HTTP y CORS
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/equipment", equipment_routes::create_equipment_router())
        .nest("/sites", directory_routes::create_site_router())
        .nest("/operators", directory_routes::create_operator_router())
        .nest("/rentals", rental_routes::create_rental_router())
        .nest("/usage-logs", usage_routes::create_usage_router())
        .nest("/alerts", alert_routes::create_alert_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        backend_url: state.config.rental_api_url.clone(),
        timestamp: state.now(),
    })
}
