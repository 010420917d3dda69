//! Route definitions for the Weather Insight Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Reference data for the intake form
        .route("/conditions", get(handlers::list_conditions))
        .route("/purposes", get(handlers::list_purposes))
        .route("/policy", get(handlers::get_policy))
        // Insight pipeline
        .route("/insights", post(handlers::create_insight))
        .route("/insights/export", post(handlers::export_insight))
}
