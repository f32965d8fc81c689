#![allow(dead_code)]

//! Shared test fixtures: in-memory implementations of the store and cache
//! traits, plus a layer that injects a fake client address.

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Utc;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use linktrace::analytics::{GeoIpService, VisitEnricher};
use linktrace::application::services::Resolver;
use linktrace::domain::entities::{NewVisit, ShortLink, Visit};
use linktrace::domain::repositories::LinkRepository;
use linktrace::error::AppError;
use linktrace::infrastructure::cache::{CacheError, CacheResult, CacheService};
use linktrace::state::AppState;

struct StoreInner {
    links: Vec<ShortLink>,
    visits: Vec<Visit>,
}

/// In-memory [`LinkRepository`] whose `record_visit` applies the append and
/// the counter increment inside a single critical section, matching the
/// atomicity contract of the SQL implementation.
pub struct InMemoryLinkStore {
    inner: Mutex<StoreInner>,
    next_visit_id: AtomicI64,
    reads: AtomicUsize,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                links: Vec::new(),
                visits: Vec::new(),
            }),
            next_visit_id: AtomicI64::new(1),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn seed_link(&self, id: i64, code: &str, alias: Option<&str>, url: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.links.push(ShortLink {
            id,
            short_code: code.to_string(),
            custom_alias: alias.map(|s| s.to_string()),
            original_url: url.to_string(),
            owner_id: None,
            qr_image: None,
            visit_count: 0,
            created_at: Utc::now(),
        });
    }

    /// Number of `find_by_code_or_alias` calls issued so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn visit_count(&self, link_id: i64) -> i64 {
        let inner = self.inner.lock().unwrap();
        inner
            .links
            .iter()
            .find(|l| l.id == link_id)
            .map(|l| l.visit_count)
            .unwrap_or(0)
    }

    pub fn stored_visits(&self, link_id: i64) -> Vec<Visit> {
        let inner = self.inner.lock().unwrap();
        inner
            .visits
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkStore {
    async fn find_by_code_or_alias(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(inner.links.iter().find(|l| l.matches(code)).cloned())
    }

    async fn record_visit(&self, link_id: i64, visit: NewVisit) -> Result<(), AppError> {
        let id = self.next_visit_id.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        let link = inner
            .links
            .iter_mut()
            .find(|l| l.id == link_id)
            .ok_or_else(|| AppError::internal("unknown link id"))?;
        link.visit_count += 1;
        inner.visits.push(Visit::from_new(id, link_id, visit));
        Ok(())
    }

    async fn visits_for_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError> {
        Ok(self.stored_visits(link_id))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory [`CacheService`] with real TTL expiry, a fault switch, and
/// operation counters for asserting cache behavior.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    failing: AtomicBool,
    sets: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            sets: AtomicUsize::new(0),
        }
    }

    /// When failing, every operation returns a connection error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `set_url` calls.
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Current live (non-expired) value for a cache key like `url:abc123`.
    pub fn entry(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|(_, expires)| Instant::now() < *expires)
            .map(|(value, _)| value.clone())
    }

    fn check_failing(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::Connection("cache is down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        self.check_failing()?;
        let mut entries = self.entries.lock().unwrap();
        let key = format!("url:{code}");
        let live = match entries.get(&key) {
            Some((value, expires)) if Instant::now() < *expires => Some(value.clone()),
            _ => None,
        };
        if live.is_none() {
            entries.remove(&key);
        }
        Ok(live)
    }

    async fn set_url(&self, code: &str, original_url: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.check_failing()?;
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            format!("url:{code}"),
            (
                original_url.to_string(),
                Instant::now() + Duration::from_secs(ttl_seconds),
            ),
        );
        self.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        self.check_failing()?;
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&format!("url:{code}"));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }
}

/// Builds the full service graph over the in-memory implementations.
pub fn test_state(
    links: Arc<InMemoryLinkStore>,
    cache: Arc<InMemoryCache>,
    cache_ttl_seconds: u64,
) -> AppState {
    let enricher = Arc::new(VisitEnricher::new(GeoIpService::disabled()));
    let resolver = Arc::new(Resolver::new(
        links.clone(),
        cache.clone(),
        enricher,
        cache_ttl_seconds,
    ));
    AppState::new(resolver, links, cache)
}

/// Injects a fixed [`ConnectInfo`] so handlers see a client address without
/// a real TCP connection.
#[derive(Clone)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl MockConnectInfoLayer {
    pub fn localhost() -> Self {
        Self("127.0.0.1:12345".parse().unwrap())
    }
}

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}
