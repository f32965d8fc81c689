//! Short link entity: the canonical record a code resolves to.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A short link record as stored in the `links` table.
///
/// `short_code` and `custom_alias` are both lookup keys; everything except
/// `visit_count` is immutable after creation. `visit_count` is maintained by
/// the visit recorder and always equals the number of `link_visits` rows for
/// this record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub qr_image: Option<String>,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// The key the link is publicly addressed by: the alias when one is set,
    /// the generated code otherwise.
    pub fn display_code(&self) -> &str {
        self.custom_alias.as_deref().unwrap_or(&self.short_code)
    }

    /// Returns true if `code` matches either lookup key (case-sensitive).
    pub fn matches(&self, code: &str) -> bool {
        self.short_code == code || self.custom_alias.as_deref() == Some(code)
    }
}
