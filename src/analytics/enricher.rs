//! Visit enrichment: raw request metadata in, complete visit record out.

use chrono::Utc;
use woothee::parser::Parser;

use crate::analytics::geoip::GeoIpService;
use crate::domain::entities::{BrowserInfo, DeviceInfo, GeoInfo, NewVisit, OsInfo};

/// Raw per-request metadata captured by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Client address as reported by the connection, possibly in the
    /// IPv6-mapped-IPv4 textual form (`::ffff:a.b.c.d`).
    pub remote_addr: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Turns request metadata into a structured [`NewVisit`].
///
/// Pure and infallible: user-agent parsing, address normalization and
/// geolocation each have documented defaults, so enrichment always
/// produces a complete record and never aborts the caller.
pub struct VisitEnricher {
    geo: GeoIpService,
    parser: Parser,
}

impl VisitEnricher {
    pub fn new(geo: GeoIpService) -> Self {
        Self {
            geo,
            parser: Parser::new(),
        }
    }

    /// Builds a visit record from the request metadata, stamped with the
    /// current time.
    pub fn enrich(&self, meta: &RequestMeta) -> NewVisit {
        let client_ip = normalize_ip(&meta.remote_addr).to_string();

        let (device, browser, os) = match meta.user_agent.as_deref() {
            Some(ua) if !ua.is_empty() => self.parse_user_agent(ua),
            _ => Default::default(),
        };

        let location = match client_ip.parse() {
            Ok(ip) => self.geo.lookup(ip),
            Err(_) => GeoInfo::default(),
        };

        NewVisit {
            visited_at: Utc::now(),
            client_ip,
            user_agent: meta.user_agent.clone().unwrap_or_default(),
            referer: meta
                .referer
                .clone()
                .unwrap_or_else(|| "Direct".to_string()),
            device,
            browser,
            os,
            location,
        }
    }

    /// Parses a User-Agent string with woothee, mapping its `UNKNOWN`
    /// sentinel onto the `Unknown` default convention.
    fn parse_user_agent(&self, ua: &str) -> (DeviceInfo, BrowserInfo, OsInfo) {
        let result = self.parser.parse(ua).unwrap_or_default();

        let mut device = DeviceInfo {
            kind: device_kind(result.category).to_string(),
            ..Default::default()
        };
        if !result.vendor.is_empty() && result.vendor != "UNKNOWN" {
            device.vendor = result.vendor.to_string();
        }

        let mut browser = BrowserInfo::default();
        if result.name != "UNKNOWN" {
            browser.name = result.name.to_string();
        }
        if !result.version.is_empty() && result.version != "UNKNOWN" {
            browser.version = result.version.to_string();
        }

        let mut os = OsInfo::default();
        if result.os != "UNKNOWN" {
            os.name = result.os.to_string();
        }
        if !result.os_version.is_empty() && result.os_version != "UNKNOWN" {
            os.version = result.os_version.to_string();
        }

        (device, browser, os)
    }
}

/// Strips the IPv6-mapped-IPv4 textual prefix so dual-stack listeners store
/// plain IPv4 addresses.
fn normalize_ip(addr: &str) -> &str {
    addr.strip_prefix("::ffff:").unwrap_or(addr)
}

/// Maps woothee device categories onto the stored device kinds.
///
/// Undeterminable clients count as desktop, matching the convention that an
/// unset device type implies a non-mobile/non-tablet client.
fn device_kind(category: &str) -> &'static str {
    match category {
        "smartphone" | "mobilephone" => "mobile",
        "appliance" => "smarttv",
        "crawler" => "crawler",
        _ => "desktop",
    }
}
