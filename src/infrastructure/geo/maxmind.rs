//! GeoIP lookup against a MaxMind City database.

use anyhow::{Context, Result};
use async_trait::async_trait;
use maxminddb::{Mmap, Reader, geoip2};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::domain::geo::{GeoError, GeoLocator, Location};

/// [`GeoLocator`] backed by a memory-mapped GeoLite2-City or GeoIP2-City file.
///
/// Lookups are synchronous reads from the mapped file and never block on I/O
/// beyond page faults. Cloning shares the reader.
#[derive(Clone)]
pub struct MaxMindGeoLocator {
    reader: Arc<Reader<Mmap>>,
}

impl MaxMindGeoLocator {
    /// Opens the `.mmdb` file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = unsafe { Reader::open_mmap(path) }
            .with_context(|| format!("Failed to open GeoIP City database at {}", path.display()))?;

        info!(path = %path.display(), "Opened GeoIP database");
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Looks up `ip` synchronously.
    pub fn lookup(&self, ip: IpAddr) -> Result<Location, GeoError> {
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| GeoError::Unavailable(e.to_string()))?;

        let city = result
            .decode::<geoip2::City>()
            .map_err(|e| GeoError::Unavailable(e.to_string()))?
            .ok_or_else(|| GeoError::NotFound(ip.to_string()))?;

        Ok(Location {
            country: city.country.names.english.map(|s| s.to_string()),
            country_code: city.country.iso_code.map(|s| s.to_string()),
            city: city.city.names.english.map(|s| s.to_string()),
            latitude: city.location.latitude,
            longitude: city.location.longitude,
            timezone: city.location.time_zone.map(|s| s.to_string()),
        })
    }
}

/// Accepts a bare IP or a socket address (`1.2.3.4:80`, `[::1]:80`).
pub fn parse_client_address(address: &str) -> Result<IpAddr, GeoError> {
    let address = address.trim();
    address
        .parse::<IpAddr>()
        .or_else(|_| address.parse::<SocketAddr>().map(|s| s.ip()))
        .map_err(|_| GeoError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl GeoLocator for MaxMindGeoLocator {
    async fn locate(&self, address: &str) -> Result<Location, GeoError> {
        let ip = parse_client_address(address)?;
        self.lookup(ip)
    }
}
