//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::analytics::RequestMeta;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and records the visit.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture client address, User-Agent and Referer
/// 2. Delegate to the resolver (cache check, store read, cache
///    repopulation, visit recording)
/// 3. Return `302 Found` with the destination in `Location`
///
/// # Errors
///
/// Returns `404 {"error": "URL not found"}` for an unknown code and
/// `500 {"error": "Server error"}` on store failure. A cache failure is
/// never client-visible.
pub async fn redirect_handler(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let meta = RequestMeta {
        remote_addr: addr.ip().to_string(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        referer: headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
    };

    let destination = state.resolver.resolve(&code, meta).await?;

    // The external contract pins 302; axum's Redirect helpers only offer
    // 303/307/308, so the response is built by hand.
    Ok((StatusCode::FOUND, [(header::LOCATION, destination)]).into_response())
}
