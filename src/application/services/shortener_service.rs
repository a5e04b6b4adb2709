//! Link creation and resolution service.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::application::geo_fence::GeoFence;
use crate::application::rate_limiter::RateLimiter;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_well_formed};
use crate::utils::deadline::with_deadline;
use crate::utils::destination::validate_destination;

/// Maximum number of codes tried before giving up on a creation.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// How far into the past a forced expiration moves `expires_at`.
const FORCED_EXPIRY_OFFSET_HOURS: i64 = 1;

/// Service for creating and resolving shortened links.
///
/// Guards both paths with a per-client [`RateLimiter`]. Creation and
/// resolution may share one limiter (pass the same `Arc` twice) or use
/// separate budgets. Resolution can additionally be restricted by client
/// country with a [`GeoFence`].
pub struct ShortenerService<L: LinkRepository> {
    link_repository: Arc<L>,
    create_limiter: Arc<RateLimiter>,
    resolve_limiter: Arc<RateLimiter>,
    geo_fence: Option<Arc<GeoFence>>,
    store_timeout: Option<Duration>,
}

impl<L: LinkRepository> ShortenerService<L> {
    /// Creates a new shortener service.
    pub fn new(
        link_repository: Arc<L>,
        create_limiter: Arc<RateLimiter>,
        resolve_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            link_repository,
            create_limiter,
            resolve_limiter,
            geo_fence: None,
            store_timeout: None,
        }
    }

    /// Checks every resolving client against `fence`.
    pub fn with_geo_fence(mut self, fence: Arc<GeoFence>) -> Self {
        self.geo_fence = Some(fence);
        self
    }

    /// Bounds every store call made by this service.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Creates a short link for `destination` on behalf of `client`.
    ///
    /// # Arguments
    ///
    /// - `client` - Rate-limit key of the caller (client address)
    /// - `destination` - Absolute URL to redirect to, stored as given
    /// - `ttl` - Optional lifetime; the link never expires when `None`
    ///
    /// # Code Generation
    ///
    /// Generates a random 8-character code and inserts it. The store rejects
    /// duplicates with [`AppError::Conflict`], in which case a fresh code is
    /// tried, up to [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] if `client` is over its creation budget
    /// - [`AppError::InvalidDestination`] if the URL lacks a scheme or host
    /// - [`AppError::Validation`] if `ttl` is not positive
    /// - [`AppError::ExhaustedRetries`] if every attempted code collided
    /// - [`AppError::Persistence`] / [`AppError::Timeout`] on store failures
    pub async fn create_short_link(
        &self,
        client: &str,
        destination: &str,
        ttl: Option<chrono::Duration>,
    ) -> Result<Link, AppError> {
        self.create_limiter.check(client)?;

        validate_destination(destination).inspect_err(|e| {
            warn!(destination, error = %e, "Rejected invalid destination");
        })?;

        let now = Utc::now();
        let expires_at = match ttl {
            Some(ttl) if ttl <= chrono::Duration::zero() => {
                return Err(AppError::bad_request("Expiration must be in the future"));
            }
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or_else(|| AppError::bad_request("Expiration is out of range"))?,
            ),
            None => None,
        };

        let long_url = destination.to_string();

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code().inspect_err(|e| {
                error!(error = %e, "Entropy source failed");
            })?;

            let new_link = NewLink {
                code: code.clone(),
                long_url: long_url.clone(),
                expires_at,
            };

            match with_deadline(self.store_timeout, self.link_repository.create(new_link)).await {
                Ok(link) => {
                    info!(
                        code = %link.code,
                        long_url = %link.long_url,
                        expires_at = ?link.expires_at,
                        "Created short link"
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, code = %code, "Short code collision, regenerating");
                }
                Err(e) => {
                    error!(error = %e, long_url = %long_url, "Failed to create short link");
                    return Err(e);
                }
            }
        }

        error!(
            attempts = MAX_CODE_ATTEMPTS,
            long_url = %long_url,
            "Gave up allocating a unique short code"
        );
        Err(AppError::ExhaustedRetries {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Resolves a short code to its live link on behalf of `client`.
    ///
    /// Does not record a click; callers decide whether the visit counts
    /// (e.g. skip `HEAD` requests) and call
    /// [`crate::application::services::ClickRecorder::record`] themselves.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] if `client` is over its resolution budget
    /// - [`AppError::GeoRestricted`] if a geo fence is set and `client`
    ///   locates to a restricted country
    /// - [`AppError::NotFound`] if no link has this code
    /// - [`AppError::Expired`] if the link exists but is no longer live
    /// - [`AppError::Persistence`] / [`AppError::Timeout`] on store failures
    pub async fn resolve_short_link(&self, client: &str, code: &str) -> Result<Link, AppError> {
        self.resolve_limiter.check(client)?;

        if let Some(fence) = &self.geo_fence {
            fence.check(client).await?;
        }

        let link = self.find_link(code).await?;

        if !link.is_live_at(Utc::now()) {
            warn!(code, expires_at = ?link.expires_at, "Short link has expired");
            return Err(AppError::expired(code));
        }

        debug!(code, long_url = %link.long_url, "Resolved short link");
        Ok(link)
    }

    /// Retrieves a link by code without checking liveness or rate limits.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn find_link(&self, code: &str) -> Result<Link, AppError> {
        if !is_well_formed(code) {
            return Err(AppError::not_found(code));
        }

        with_deadline(self.store_timeout, self.link_repository.find_by_code(code))
            .await?
            .ok_or_else(|| {
                debug!(code, "Short link not found");
                AppError::not_found(code)
            })
    }

    /// Forces a link to expire by moving `expires_at` into the past.
    ///
    /// Intended for administrative and test use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn force_expire(&self, code: &str) -> Result<Link, AppError> {
        let expired_at = Utc::now() - chrono::Duration::hours(FORCED_EXPIRY_OFFSET_HOURS);

        let link = with_deadline(
            self.store_timeout,
            self.link_repository.set_expiration(code, Some(expired_at)),
        )
        .await?
        .ok_or_else(|| AppError::not_found(code))?;

        info!(code, expires_at = ?link.expires_at, "Forced short link expiration");
        Ok(link)
    }
}
