//! Redirect resolution service.
//!
//! Answers "where does this code redirect" and records the visit, in one
//! request. The cache is an existence hint only: the canonical record is
//! always read from the store, because the visit write needs its handle.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::analytics::{RequestMeta, VisitEnricher};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Orchestrates cache lookup, store read, cache population and visit
/// recording for a single redirect request.
///
/// All collaborators are injected so tests can substitute mocks or
/// fault-injecting implementations.
pub struct Resolver {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    enricher: Arc<VisitEnricher>,
    cache_ttl_seconds: u64,
}

impl Resolver {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        enricher: Arc<VisitEnricher>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            links,
            cache,
            enricher,
            cache_ttl_seconds,
        }
    }

    /// Resolves `code` to its destination URL and records the visit.
    ///
    /// # Request Flow
    ///
    /// 1. Best-effort cache lookup; a backend error is logged and treated
    ///    exactly like a miss, never surfaced.
    /// 2. Authoritative store read by code or alias, regardless of the
    ///    cache outcome.
    /// 3. Unknown code -> [`AppError::NotFound`], no side effects.
    /// 4. On a cache miss, repopulate the cache under the configured TTL;
    ///    write failures are logged and swallowed. A not-found code is
    ///    never cached, so repeated misses always reach the store.
    /// 5. Enrich the request metadata into a visit record.
    /// 6. Record the visit (atomic append + counter increment). A store
    ///    failure here fails the request: analytics are not best-effort.
    ///
    /// Per successful resolution: at most one cache write, exactly one
    /// store read, exactly one store write.
    pub async fn resolve(&self, code: &str, meta: RequestMeta) -> Result<String, AppError> {
        let cache_hit = match self.cache.get_url(code).await {
            Ok(Some(_)) => {
                debug!("Cache HIT: {}", code);
                true
            }
            Ok(None) => {
                debug!("Cache MISS: {}", code);
                false
            }
            Err(e) => {
                warn!(error = %e, code, "cache lookup failed, treating as miss");
                false
            }
        };

        let link = self
            .links
            .find_by_code_or_alias(code)
            .await?
            .ok_or(AppError::NotFound)?;

        if !cache_hit
            && let Err(e) = self
                .cache
                .set_url(code, &link.original_url, self.cache_ttl_seconds)
                .await
        {
            warn!(error = %e, code, "cache population failed");
        }

        let visit = self.enricher.enrich(&meta);
        self.links.record_visit(link.id, visit).await?;

        Ok(link.original_url)
    }
}
