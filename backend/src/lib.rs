//! Weather Insight Platform - Backend
//!
//! Turns a location, an activity and a set of extreme-weather concerns into a
//! 14-day series, per-condition severity analysis, advice and exports.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};

use crate::services::InsightService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub insights: Arc<InsightService>,
}

impl AppState {
    /// Build state with the collaborators named in configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let insights = InsightService::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            insights: Arc::new(insights),
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weather Insight Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
