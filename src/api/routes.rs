//! API route configuration.

use crate::api::handlers::analytics_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// API routes.
///
/// # Endpoints
///
/// - `GET /analytics/{code}` - Visit log and counter for a link
pub fn routes() -> Router<AppState> {
    Router::new().route("/analytics/{code}", get(analytics_handler))
}
