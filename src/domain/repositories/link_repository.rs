//! Repository trait for short link data access.

use crate::domain::entities::{NewVisit, ShortLink, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the durable link store: the source of truth for
/// resolution and the only component that mutates a record.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link whose `short_code` or `custom_alias` equals `code`
    /// (case-sensitive).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if no record matches
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code_or_alias(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Appends a visit to the link's visit log and increments its
    /// `visit_count` by one, as a single atomic store-level operation.
    ///
    /// Concurrent calls against the same link must all be reflected: after
    /// N successful recordings the counter has grown by exactly N and N new
    /// rows exist. Implementations must not read-modify-write two
    /// separately fetched fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors; unlike cache
    /// population, a failure here fails the whole request.
    async fn record_visit(&self, link_id: i64, visit: NewVisit) -> Result<(), AppError>;

    /// Returns the visit log for a link in append order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn visits_for_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError>;

    /// Checks if the store backend is reachable.
    ///
    /// Used by the health check endpoint.
    async fn health_check(&self) -> bool;
}
