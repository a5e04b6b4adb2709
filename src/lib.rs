//! # URL Shortener Core
//!
//! Link creation, resolution and click analytics for a URL shortening
//! service, independent of any HTTP transport.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, store contracts, device and geo classification
//! - **Application Layer** ([`application`]) - Shortener, click recording, analytics, rate limiting
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL and in-memory stores, MaxMind geolocation
//!
//! ## Features
//!
//! - Random 8-character URL-safe short codes with collision retry
//! - Optional per-link expiry, checked lazily at resolution
//! - Per-client sliding-window rate limiting
//! - Optional country restriction on resolution, failing open
//! - Click recording with device family and best-effort geolocation
//! - Per-link summaries by device, country and recency
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use url_shortener_core::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), AppError> {
//! let links = Arc::new(InMemoryLinkRepository::new());
//! let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
//! let shortener = ShortenerService::new(links, limiter.clone(), limiter);
//!
//! let link = shortener
//!     .create_short_link("203.0.113.7", "https://example.com/docs", None)
//!     .await?;
//! let resolved = shortener.resolve_short_link("203.0.113.7", &link.code).await?;
//! assert_eq!(resolved.long_url, "https://example.com/docs");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Runtime settings are loaded from environment variables via [`config::Config`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::click_queue::{PendingClick, run_click_worker};
    pub use crate::application::geo_fence::GeoFence;
    pub use crate::application::rate_limiter::{RateLimitConfig, RateLimiter};
    pub use crate::application::services::{
        AnalyticsAggregator, ClickRecorder, CountryCount, ShortenerService, Summary,
    };
    pub use crate::domain::entities::{ClickEvent, DeviceType, Link, NewLink};
    pub use crate::domain::geo::{GeoLocator, Location, NullGeoLocator};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{InMemoryClickRepository, InMemoryLinkRepository};
}
