//! Analytics response DTO.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Visit;

/// Link metadata plus its full visit log.
///
/// `short_code` is the public key: the custom alias when one is set.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub original_url: String,
    pub short_code: String,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
    pub visits: Vec<Visit>,
}
