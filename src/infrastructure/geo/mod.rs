//! Geolocation backends.
//!
//! - [`MaxMindGeoLocator`] - memory-mapped MaxMind GeoLite2/GeoIP2 City database

pub mod maxmind;

pub use maxmind::MaxMindGeoLocator;
