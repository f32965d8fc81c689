//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::{
    BrowserInfo, DeviceInfo, GeoInfo, NewVisit, OsInfo, ShortLink, Visit,
};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and visit recording.
///
/// Uses runtime-bound prepared statements for SQL injection protection.
/// The visit recorder issues a single statement so the row append and the
/// counter increment cannot be observed separately.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Flat row shape for `link_visits`, mapped into the nested [`Visit`].
#[derive(sqlx::FromRow)]
struct VisitRow {
    id: i64,
    link_id: i64,
    visited_at: chrono::DateTime<chrono::Utc>,
    client_ip: String,
    user_agent: String,
    referer: String,
    device_kind: String,
    device_model: String,
    device_vendor: String,
    browser_name: String,
    browser_version: String,
    os_name: String,
    os_version: String,
    geo_country: String,
    geo_region: String,
    geo_city: String,
    geo_timezone: String,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: row.id,
            link_id: row.link_id,
            visited_at: row.visited_at,
            client_ip: row.client_ip,
            user_agent: row.user_agent,
            referer: row.referer,
            device: DeviceInfo {
                kind: row.device_kind,
                model: row.device_model,
                vendor: row.device_vendor,
            },
            browser: BrowserInfo {
                name: row.browser_name,
                version: row.browser_version,
            },
            os: OsInfo {
                name: row.os_name,
                version: row.os_version,
            },
            location: GeoInfo {
                country: row.geo_country,
                region: row.geo_region,
                city: row.geo_city,
                timezone: row.geo_timezone,
            },
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_code_or_alias(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_code, custom_alias, original_url, owner_id,
                   qr_image, visit_count, created_at
            FROM links
            WHERE short_code = $1 OR custom_alias = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn record_visit(&self, link_id: i64, visit: NewVisit) -> Result<(), AppError> {
        // One statement: the visit row and the counter increment commit
        // together, and concurrent recorders serialize on the links row.
        let result = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO link_visits (
                    link_id, visited_at, client_ip, user_agent, referer,
                    device_kind, device_model, device_vendor,
                    browser_name, browser_version,
                    os_name, os_version,
                    geo_country, geo_region, geo_city, geo_timezone
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                RETURNING link_id
            )
            UPDATE links
            SET visit_count = visit_count + 1
            WHERE id = (SELECT link_id FROM inserted)
            "#,
        )
        .bind(link_id)
        .bind(visit.visited_at)
        .bind(&visit.client_ip)
        .bind(&visit.user_agent)
        .bind(&visit.referer)
        .bind(&visit.device.kind)
        .bind(&visit.device.model)
        .bind(&visit.device.vendor)
        .bind(&visit.browser.name)
        .bind(&visit.browser.version)
        .bind(&visit.os.name)
        .bind(&visit.os.version)
        .bind(&visit.location.country)
        .bind(&visit.location.region)
        .bind(&visit.location.city)
        .bind(&visit.location.timezone)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() != 1 {
            return Err(AppError::internal(format!(
                "visit recorded for unknown link id {link_id}"
            )));
        }

        Ok(())
    }

    async fn visits_for_link(&self, link_id: i64) -> Result<Vec<Visit>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, link_id, visited_at, client_ip, user_agent, referer,
                   device_kind, device_model, device_vendor,
                   browser_name, browser_version,
                   os_name, os_version,
                   geo_country, geo_region, geo_city, geo_timezone
            FROM link_visits
            WHERE link_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .map(|row| !row.is_empty())
            .unwrap_or(false)
    }
}
