//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// Uniqueness of `code` must be enforced atomically by the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, regardless of expiration.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Overwrites the expiration timestamp of a link.
    ///
    /// Returns the updated link, or `Ok(None)` if no link matches `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn set_expiration(
        &self,
        code: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Link>, AppError>;
}
