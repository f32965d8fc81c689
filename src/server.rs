//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, cache setup with graceful
//! fallback, and the Axum server lifecycle.

use crate::analytics::{GeoIpService, VisitEnricher};
use crate::application::services::Resolver;
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache (or NullCache fallback when Redis is absent or down)
/// - GeoIP database (or disabled geolocation)
/// - Axum HTTP server with per-connection client addresses
///
/// # Errors
///
/// Returns an error if the database connection, migrations, or server bind
/// fail. Cache and GeoIP failures are deliberately non-fatal.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let geo = match config.geoip_db_path.as_deref() {
        Some(path) => match GeoIpService::new(Some(path)) {
            Ok(geo) => {
                tracing::info!("GeoIP database loaded from {}", path);
                geo
            }
            Err(e) => {
                tracing::warn!("Failed to load GeoIP database: {}. Geolocation disabled.", e);
                GeoIpService::disabled()
            }
        },
        None => GeoIpService::disabled(),
    };

    let links = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let enricher = Arc::new(VisitEnricher::new(geo));
    let resolver = Arc::new(Resolver::new(
        links.clone(),
        cache.clone(),
        enricher,
        config.cache_expiry_seconds,
    ));

    let state = AppState::new(resolver, links, cache);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
