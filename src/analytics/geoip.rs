//! GeoIP lookup using a MaxMind GeoLite2/GeoIP2 City database.
//!
//! The database is optional: without one, every lookup yields the default
//! all-`Unknown` location and resolution proceeds normally.

use anyhow::{Context, Result};
use maxminddb::{Mmap, Reader, geoip2};
use std::net::IpAddr;
use std::sync::Arc;

use crate::domain::entities::GeoInfo;

/// Thread-safe geolocation service over a memory-mapped MMDB file.
pub struct GeoIpService {
    city_reader: Option<Arc<Reader<Mmap>>>,
}

impl GeoIpService {
    /// Opens the City database at `city_path`, or builds a disabled service
    /// when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is given but the file cannot be opened
    /// or is not a valid MMDB database.
    pub fn new(city_path: Option<&str>) -> Result<Self> {
        let city_reader = if let Some(path) = city_path {
            let reader = unsafe { Reader::open_mmap(path) }
                .with_context(|| format!("Failed to open GeoIP City database at {}", path))?;
            Some(Arc::new(reader))
        } else {
            None
        };

        Ok(Self { city_reader })
    }

    /// A service with no database; every lookup returns the defaults.
    pub fn disabled() -> Self {
        Self { city_reader: None }
    }

    /// Returns true when a database is loaded.
    pub fn is_enabled(&self) -> bool {
        self.city_reader.is_some()
    }

    /// Looks up the location of an IP address.
    ///
    /// Never fails: a missing database, an address with no entry, or a
    /// decode error all yield fields defaulted to `"Unknown"`.
    pub fn lookup(&self, ip: IpAddr) -> GeoInfo {
        let mut location = GeoInfo::default();

        if let Some(ref reader) = self.city_reader
            && let Ok(result) = reader.lookup(ip)
            && let Ok(Some(city)) = result.decode::<geoip2::City>()
        {
            if let Some(country) = city.country.iso_code {
                location.country = country.to_string();
            }
            if let Some(region) = city
                .subdivisions
                .first()
                .and_then(|subdivision| subdivision.iso_code)
            {
                location.region = region.to_string();
            }
            if let Some(name) = city.city.names.english {
                location.city = name.to_string();
            }
            if let Some(tz) = city.location.time_zone {
                location.timezone = tz.to_string();
            }
        }

        location
    }
}

// Implement Clone by cloning the Arc
impl Clone for GeoIpService {
    fn clone(&self) -> Self {
        Self {
            city_reader: self.city_reader.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_service_returns_defaults() {
        let geo = GeoIpService::disabled();
        assert!(!geo.is_enabled());

        let location = geo.lookup("203.0.113.5".parse().unwrap());
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.region, "Unknown");
        assert_eq!(location.city, "Unknown");
        assert_eq!(location.timezone, "Unknown");
    }

    #[test]
    fn test_missing_database_file_is_an_error() {
        assert!(GeoIpService::new(Some("/nonexistent/GeoLite2-City.mmdb")).is_err());
    }
}
