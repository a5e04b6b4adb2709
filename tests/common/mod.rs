#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use url_shortener_core::prelude::*;

/// In-memory wiring of every core service.
pub struct TestCore {
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub shortener: ShortenerService<InMemoryLinkRepository>,
    pub recorder: ClickRecorder<InMemoryClickRepository>,
    pub analytics: AnalyticsAggregator<InMemoryLinkRepository, InMemoryClickRepository>,
}

impl TestCore {
    /// Wires a shortener whose resolution refuses `restricted` countries, as
    /// located by [`TableGeoLocator`].
    pub fn with_geo_fence(restricted: &[&str]) -> Self {
        let mut core = Self::with_geo(
            RateLimitConfig::per_minute(10_000),
            Arc::new(TableGeoLocator),
        );
        let fence = GeoFence::new(Arc::new(TableGeoLocator), restricted);
        core.shortener = ShortenerService::new(
            core.links.clone(),
            Arc::new(RateLimiter::new(RateLimitConfig::per_minute(10_000))),
            Arc::new(RateLimiter::new(RateLimitConfig::per_minute(10_000))),
        )
        .with_geo_fence(Arc::new(fence));
        core
    }

    pub fn new() -> Self {
        Self::with_limits(RateLimitConfig::per_minute(10_000))
    }

    pub fn with_limits(limits: RateLimitConfig) -> Self {
        Self::with_geo(limits, Arc::new(NullGeoLocator))
    }

    pub fn with_geo(limits: RateLimitConfig, geo: Arc<dyn GeoLocator>) -> Self {
        let links = Arc::new(InMemoryLinkRepository::new());
        let clicks = Arc::new(InMemoryClickRepository::new());

        let create_limiter = Arc::new(RateLimiter::new(limits));
        let resolve_limiter = Arc::new(RateLimiter::new(limits));

        Self {
            shortener: ShortenerService::new(links.clone(), create_limiter, resolve_limiter)
                .with_store_timeout(Duration::from_secs(5)),
            recorder: ClickRecorder::new(clicks.clone(), geo),
            analytics: AnalyticsAggregator::new(links.clone(), clicks.clone()),
            links,
            clicks,
        }
    }
}

/// Locator that resolves every address to a fixed country by its first octet.
pub struct TableGeoLocator;

#[async_trait::async_trait]
impl GeoLocator for TableGeoLocator {
    async fn locate(
        &self,
        address: &str,
    ) -> Result<Location, url_shortener_core::domain::geo::GeoError> {
        let (country, code) = match address.split('.').next() {
            Some("1") => ("United States", "US"),
            Some("2") => ("Australia", "AU"),
            Some("3") => ("Russia", "RU"),
            _ => {
                return Err(url_shortener_core::domain::geo::GeoError::NotFound(
                    address.to_string(),
                ));
            }
        };

        Ok(Location {
            country: Some(country.to_string()),
            country_code: Some(code.to_string()),
            ..Default::default()
        })
    }
}

pub const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
pub const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
pub const WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub async fn insert_link(
    pool: &PgPool,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
) -> i64 {
    sqlx::query_scalar("INSERT INTO links (code, long_url, expires_at) VALUES ($1, $2, $3) RETURNING id")
        .bind(code)
        .bind(url)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .unwrap()
}
