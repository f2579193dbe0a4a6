//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/show", get(handlers::show))
        .route("/get", get(handlers::get_metadata))
        .route("/redirect", get(handlers::redirect))
        // Health check (intentionally unauthenticated for load balancers)
        .route("/health", get(handlers::health_check));

    // The ingestion endpoint only exists when explicitly enabled.
    if state.config.options.enable_upload {
        router = router.route("/upload", post(handlers::upload));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
