use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// Mounted under `/api`. These endpoints expose the route table to the
/// client so programmatic navigation follows the same guard as page loads.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/routes
        // The registered routes with their authentication requirement.
        .route("/routes", get(handlers::list_routes))
        // GET /api/navigate?path=/books/42
        // Resolve + guard for a path, answered as allow / redirect / not_found.
        .route("/navigate", get(handlers::navigate))
}
