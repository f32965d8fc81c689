//! Visit analytics: user-agent parsing, IP normalization and geolocation.

mod enricher;
mod geoip;

pub use enricher::{RequestMeta, VisitEnricher};
pub use geoip::GeoIpService;
