use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Experiment endpoints (read-only)
        .route("/experiments", get(handlers::experiments::list_experiments))
        .route(
            "/experiment_results/:experiment_id",
            get(handlers::experiments::get_experiment_results),
        )
        // Add state
        .with_state(state)
        // Add CORS
        .layer(CorsLayer::permissive())
}
