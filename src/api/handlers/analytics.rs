//! Handler for per-link visit analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the visit log and counter for a short link.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// Matches on short code or custom alias, like the redirect path. Reading
/// analytics is not a visit: nothing is recorded.
///
/// # Errors
///
/// Returns 404 Not Found if no record matches.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let link = state
        .links
        .find_by_code_or_alias(&code)
        .await?
        .ok_or(AppError::NotFound)?;

    let visits = state.links.visits_for_link(link.id).await?;

    Ok(Json(AnalyticsResponse {
        original_url: link.original_url,
        short_code: link
            .custom_alias
            .unwrap_or(link.short_code),
        visit_count: link.visit_count,
        created_at: link.created_at,
        qr_image: link.qr_image,
        visits,
    }))
}
