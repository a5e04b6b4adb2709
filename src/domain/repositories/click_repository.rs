//! Repository trait for click event storage.

use crate::domain::entities::{ClickEvent, NewClickEvent, Summary};
use crate::error::AppError;
use async_trait::async_trait;

/// Append/query interface over recorded click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryClickRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the write fails.
    async fn record(&self, new_click: NewClickEvent) -> Result<ClickEvent, AppError>;

    /// Returns every click event recorded for a link, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn list_by_link(&self, link_id: i64) -> Result<Vec<ClickEvent>, AppError>;

    /// Aggregates a link's clicks into a [`Summary`] computed from one
    /// consistent view of the store.
    ///
    /// A link with no clicks yields a zero-valued summary. Whether the link
    /// itself exists is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn summarize(&self, link_id: i64) -> Result<Summary, AppError>;
}
