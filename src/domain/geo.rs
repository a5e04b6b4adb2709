//! Geolocation lookup contract.
//!
//! The core treats geolocation as best-effort: a failed lookup downgrades the
//! click to "no geo data" and never fails the enclosing operation.

use async_trait::async_trait;
use serde::Serialize;

/// Approximate location of a client address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("No location data for {0}")]
    NotFound(String),

    #[error("Geolocation unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a client address to an approximate [`Location`].
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::MaxMindGeoLocator`] - MaxMind GeoLite2-City database
/// - [`NullGeoLocator`] - no backend configured
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, address: &str) -> Result<Location, GeoError>;
}

/// Locator used when no geolocation database is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeoLocator;

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn locate(&self, _address: &str) -> Result<Location, GeoError> {
        Err(GeoError::Unavailable("no geolocation backend".to_string()))
    }
}
