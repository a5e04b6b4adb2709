//! Click recording with device and geo classification.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::domain::device::classify_device;
use crate::domain::entities::{ClickEvent, NewClickEvent};
use crate::domain::geo::{GeoLocator, Location};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::utils::deadline::with_deadline;

/// Builds click events from request metadata and persists them.
///
/// Classification never fails the recording: an unknown User-Agent becomes
/// `other`, and any geolocation failure or timeout leaves every geo field
/// empty. Only a failed store write is reported to the caller.
pub struct ClickRecorder<C: ClickRepository> {
    click_repository: Arc<C>,
    geo_locator: Arc<dyn GeoLocator>,
    geo_timeout: Option<Duration>,
    store_timeout: Option<Duration>,
}

impl<C: ClickRepository> ClickRecorder<C> {
    /// Creates a new click recorder.
    pub fn new(click_repository: Arc<C>, geo_locator: Arc<dyn GeoLocator>) -> Self {
        Self {
            click_repository,
            geo_locator,
            geo_timeout: None,
            store_timeout: None,
        }
    }

    /// Bounds each geolocation lookup. A lookup that runs over is treated as
    /// a miss.
    pub fn with_geo_timeout(mut self, timeout: Duration) -> Self {
        self.geo_timeout = Some(timeout);
        self
    }

    /// Bounds each store write.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Records one visit to the link `link_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] or [`AppError::Timeout`] if the
    /// store write fails. Classification failures are absorbed.
    pub async fn record(
        &self,
        link_id: i64,
        client_address: &str,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<ClickEvent, AppError> {
        let device_type = classify_device(user_agent);

        let mut new_click =
            NewClickEvent::new(link_id, client_address, user_agent, device_type, now);
        if let Some(location) = self.locate(client_address).await {
            new_click = new_click.with_location(location);
        }

        let click = with_deadline(self.store_timeout, self.click_repository.record(new_click))
            .await
            .inspect_err(|e| error!(link_id, error = %e, "Failed to record click"))?;

        debug!(
            link_id,
            device = %click.device_type,
            country = click.country_code.as_deref().unwrap_or("-"),
            "Recorded click"
        );
        Ok(click)
    }

    /// Best-effort location lookup. Never retried.
    async fn locate(&self, client_address: &str) -> Option<Location> {
        let lookup = self.geo_locator.locate(client_address);

        let result = match self.geo_timeout {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(client_address, ?limit, "Geolocation lookup timed out");
                    return None;
                }
            },
            None => lookup.await,
        };

        result
            .inspect_err(|e| debug!(client_address, error = %e, "No geolocation for client"))
            .ok()
    }
}
