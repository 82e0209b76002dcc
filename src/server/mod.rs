//! HTTP surface: one upload endpoint plus a health check.

mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::services::ProductPipeline;

pub use routes::{analyze_product_handler, health_handler, UPLOAD_FIELD};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ProductPipeline,
}

impl AppState {
    pub fn new(pipeline: ProductPipeline) -> Self {
        Self { pipeline }
    }
}

pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    // Fully open; this service has no auth boundary.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze-product", post(analyze_product_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
