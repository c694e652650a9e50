//! Route definitions and router construction.
//!
//! Handlers delegate to the composed core services held in `AppState`.
//! Persisted artifacts are served as static files under `/output`.

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Create the main Axum router.
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{user_id}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let output_dir = ctx.output_dir.clone();
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .route("/generate", post(handlers::generate::generate))
        .route("/history/{user_id}", get(handlers::history::list))
        .route("/can-generate/{user_id}", get(handlers::quota::can_generate))
        .route("/sumar-bonus", post(handlers::bonus::grant))
        .route("/delete", post(handlers::delete::delete))
        .nest_service("/output", ServeDir::new(output_dir))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
