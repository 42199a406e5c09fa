pub mod auth;
pub mod models;
pub mod review;

// Re-exports
pub use auth::{AuthGuard, Identity};
pub use models::*;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use review::routes::API_PREFIX;

// Liveness handler (simple, keep here)
pub async fn liveness_handler() -> &'static str {
    "Movie Review API is running"
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .merge(review::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
