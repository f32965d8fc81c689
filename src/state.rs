//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::Resolver;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Handler-facing state: the resolver plus the raw collaborators that the
/// analytics and health endpoints read directly.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        resolver: Arc<Resolver>,
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            resolver,
            links,
            cache,
        }
    }
}
