//! Click analytics for a single link.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub use crate::domain::entities::{CountryCount, Summary};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::deadline::with_deadline;

/// Service producing [`Summary`] values from stored click events.
///
/// Nothing is cached or maintained incrementally. Each call asks the click
/// store for one consistent aggregate of the link's events.
pub struct AnalyticsAggregator<L: LinkRepository, C: ClickRepository> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
    store_timeout: Option<Duration>,
}

impl<L: LinkRepository, C: ClickRepository> AnalyticsAggregator<L, C> {
    /// Creates a new analytics aggregator.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
            store_timeout: None,
        }
    }

    /// Bounds every store call made by this service.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Summarizes the clicks of the link with id `link_id`.
    ///
    /// A link with no clicks yields a zero-valued summary.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn summarize(&self, link_id: i64) -> Result<Summary, AppError> {
        with_deadline(self.store_timeout, self.link_repository.find_by_id(link_id))
            .await?
            .ok_or_else(|| AppError::not_found(link_id.to_string()))?;

        self.summarize_existing(link_id).await
    }

    /// Summarizes the clicks of the link with short code `code`.
    ///
    /// Expired links are still summarized.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn summarize_code(&self, code: &str) -> Result<Summary, AppError> {
        let link = with_deadline(self.store_timeout, self.link_repository.find_by_code(code))
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        self.summarize_existing(link.id).await
    }

    async fn summarize_existing(&self, link_id: i64) -> Result<Summary, AppError> {
        let summary =
            with_deadline(self.store_timeout, self.click_repository.summarize(link_id)).await?;

        debug!(
            link_id,
            total_clicks = summary.total_clicks,
            countries = summary.counts_by_country.len(),
            "Computed link summary"
        );
        Ok(summary)
    }
}
