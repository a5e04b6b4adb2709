//! Country-based access restriction for link resolution.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::geo::GeoLocator;
use crate::error::AppError;

/// Rejects clients whose address locates to a restricted country.
///
/// Country codes are ISO 3166-1 alpha-2 and compared case-insensitively.
/// The fence fails open: a client is admitted when the lookup fails, times
/// out or yields no country code. With no restricted countries the locator
/// is never consulted.
pub struct GeoFence {
    locator: Arc<dyn GeoLocator>,
    restricted: HashSet<String>,
    lookup_timeout: Option<Duration>,
}

impl GeoFence {
    pub fn new<I, S>(locator: Arc<dyn GeoLocator>, restricted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let restricted = restricted
            .into_iter()
            .map(|code| code.as_ref().trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .collect();

        Self {
            locator,
            restricted,
            lookup_timeout: None,
        }
    }

    /// Bounds each lookup. A lookup that runs over admits the client.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    pub fn is_restricted(&self, country_code: &str) -> bool {
        self.restricted.contains(&country_code.to_ascii_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.restricted.is_empty()
    }

    /// Admits or rejects `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GeoRestricted`] if `address` locates to a
    /// restricted country.
    pub async fn check(&self, address: &str) -> Result<(), AppError> {
        if self.restricted.is_empty() {
            return Ok(());
        }

        let Some(country_code) = self.country_of(address).await else {
            return Ok(());
        };

        if self.is_restricted(&country_code) {
            info!(address, country_code = %country_code, "Blocked by geo fence");
            return Err(AppError::GeoRestricted { country_code });
        }

        Ok(())
    }

    async fn country_of(&self, address: &str) -> Option<String> {
        let lookup = self.locator.locate(address);

        let result = match self.lookup_timeout {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(address, ?limit, "Geo fence lookup timed out, admitting");
                    return None;
                }
            },
            None => lookup.await,
        };

        match result {
            Ok(location) => location.country_code,
            Err(e) => {
                debug!(address, error = %e, "Geo fence lookup failed, admitting");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{GeoError, Location, MockGeoLocator, NullGeoLocator};

    fn located_in(code: &'static str) -> MockGeoLocator {
        let mut mock_geo = MockGeoLocator::new();
        mock_geo.expect_locate().returning(move |_| {
            Ok(Location {
                country_code: Some(code.to_string()),
                ..Default::default()
            })
        });
        mock_geo
    }

    #[tokio::test]
    async fn test_restricted_country_is_rejected() {
        let fence = GeoFence::new(Arc::new(located_in("RU")), ["RU", "CN"]);

        let result = fence.check("185.143.223.12").await;

        match result {
            Err(AppError::GeoRestricted { country_code }) => assert_eq!(country_code, "RU"),
            other => panic!("expected GeoRestricted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_country_is_admitted() {
        let fence = GeoFence::new(Arc::new(located_in("US")), ["RU", "CN"]);
        assert!(fence.check("8.8.8.8").await.is_ok());
    }

    #[tokio::test]
    async fn test_codes_compare_case_insensitively() {
        let fence = GeoFence::new(Arc::new(located_in("cn")), [" cn", ""]);

        assert!(fence.is_restricted("CN"));
        assert!(!fence.is_restricted(""));
        assert!(fence.check("1.2.3.4").await.is_err());
    }

    #[tokio::test]
    async fn test_lookup_failure_admits() {
        let mut mock_geo = MockGeoLocator::new();
        mock_geo
            .expect_locate()
            .times(1)
            .returning(|addr| Err(GeoError::InvalidAddress(addr.to_string())));
        let fence = GeoFence::new(Arc::new(mock_geo), ["RU"]);
        assert!(fence.check("not-an-ip").await.is_ok());

        let fence = GeoFence::new(Arc::new(NullGeoLocator), ["RU"]);
        assert!(fence.check("8.8.8.8").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_country_code_admits() {
        let mut mock_geo = MockGeoLocator::new();
        mock_geo
            .expect_locate()
            .returning(|_| Ok(Location::default()));
        let fence = GeoFence::new(Arc::new(mock_geo), ["RU"]);

        assert!(fence.check("8.8.8.8").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_fence_skips_lookup() {
        let mut mock_geo = MockGeoLocator::new();
        mock_geo.expect_locate().times(0);
        let fence = GeoFence::new(Arc::new(mock_geo), Vec::<String>::new());

        assert!(fence.is_empty());
        assert!(fence.check("185.143.223.12").await.is_ok());
    }

    struct StalledGeoLocator;

    #[async_trait::async_trait]
    impl GeoLocator for StalledGeoLocator {
        async fn locate(&self, _address: &str) -> Result<Location, GeoError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Location {
                country_code: Some("RU".to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_admits() {
        let fence = GeoFence::new(Arc::new(StalledGeoLocator), ["RU"])
            .with_lookup_timeout(Duration::from_millis(50));

        assert!(fence.check("185.143.223.12").await.is_ok());
    }
}
