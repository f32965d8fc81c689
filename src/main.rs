use anyhow::Result;
use tracing_subscriber::EnvFilter;

use linktrace::config::Config;
use linktrace::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        cache_expiry = config.cache_expiry_seconds,
        redis = config.redis_url.is_some(),
        geoip = config.geoip_db_path.is_some(),
        "Starting linktrace"
    );

    server::run(config).await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
