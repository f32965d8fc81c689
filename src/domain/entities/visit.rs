//! Visit entities: one record per completed redirect.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Device classification parsed from the User-Agent header.
///
/// `kind` defaults to `"desktop"` (an undeterminable client is assumed to
/// be a non-mobile browser); `model` and `vendor` default to `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub kind: String,
    pub model: String,
    pub vendor: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            kind: "desktop".to_string(),
            model: "Unknown".to_string(),
            vendor: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
}

impl Default for BrowserInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            version: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
}

impl Default for OsInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            version: "Unknown".to_string(),
        }
    }
}

/// Geolocation resolved from the client address.
///
/// Every field falls back to `"Unknown"` when the lookup fails or the geo
/// database is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoInfo {
    pub country: String,
    pub region: String,
    pub city: String,
    pub timezone: String,
}

impl Default for GeoInfo {
    fn default() -> Self {
        Self {
            country: "Unknown".to_string(),
            region: "Unknown".to_string(),
            city: "Unknown".to_string(),
            timezone: "Unknown".to_string(),
        }
    }
}

/// A fully enriched visit, ready to be appended to a link's visit log.
///
/// Produced by [`crate::analytics::VisitEnricher::enrich`]. Enrichment is
/// infallible: every field has a documented default, so a request with no
/// User-Agent, no Referer and an unresolvable address still yields a
/// complete record.
#[derive(Debug, Clone, Serialize)]
pub struct NewVisit {
    pub visited_at: DateTime<Utc>,
    pub client_ip: String,
    pub user_agent: String,
    pub referer: String,
    pub device: DeviceInfo,
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub location: GeoInfo,
}

/// A persisted visit row, as read back for the analytics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Visit {
    pub id: i64,
    pub link_id: i64,
    pub visited_at: DateTime<Utc>,
    pub client_ip: String,
    pub user_agent: String,
    pub referer: String,
    pub device: DeviceInfo,
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub location: GeoInfo,
}

impl Visit {
    /// Builds the stored form of a new visit, used by in-memory stores.
    pub fn from_new(id: i64, link_id: i64, visit: NewVisit) -> Self {
        Self {
            id,
            link_id,
            visited_at: visit.visited_at,
            client_ip: visit.client_ip,
            user_agent: visit.user_agent,
            referer: visit.referer,
            device: visit.device,
            browser: visit.browser,
            os: visit.os,
            location: visit.location,
        }
    }
}
