//! Per-client sliding-window rate limiting.
//!
//! Each key keeps the timestamps of its admitted requests inside the trailing
//! window. A request is admitted while fewer than `limit` timestamps remain
//! after pruning. State is process-local and lost on restart.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::AppError;

/// Every this many decisions, keys with empty windows are swept.
pub const PURGE_INTERVAL: u64 = 1024;

/// Limit settings for one guarded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per window.
    pub limit: u32,
    /// Length of the trailing window.
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    /// 60 requests per minute, the general-traffic default.
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(60)
    }
}

/// Sliding-window rate limiter keyed by client identity.
///
/// The key is whatever string the caller supplies, typically the client IP or
/// a trusted forwarded address. The prune, count and append sequence for a
/// key runs under that key's map entry lock, so concurrent requests for the
/// same key never both take the last slot.
///
/// Idle keys are dropped by a sweep that runs every [`PURGE_INTERVAL`]
/// decisions, so the map stays bounded by the number of keys active within
/// one window even when keys come from untrusted input.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use url_shortener_core::application::rate_limiter::{RateLimitConfig, RateLimiter};
///
/// let limiter = RateLimiter::new(RateLimitConfig::new(2, Duration::from_secs(60)));
/// let now = Instant::now();
///
/// assert!(limiter.admit_at("10.0.0.1", now));
/// assert!(limiter.admit_at("10.0.0.1", now));
/// assert!(!limiter.admit_at("10.0.0.1", now));
/// assert!(limiter.admit_at("10.0.0.2", now));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, VecDeque<Instant>>,
    decisions: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
            decisions: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Admits or rejects a request from `key` at `now`.
    ///
    /// Rejected requests are not recorded and do not extend the window.
    pub fn admit_at(&self, key: &str, now: Instant) -> bool {
        self.try_admit(key, now).is_ok()
    }

    /// Admits or rejects a request from `key` at the current instant.
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }

    /// Like [`Self::admit`], but reports rejection as an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] with the time until the oldest
    /// counted request leaves the window.
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.check_at(key, Instant::now())
    }

    /// [`Self::check`] evaluated at an explicit instant.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), AppError> {
        self.try_admit(key, now).map_err(|retry_after| {
            debug!(key, ?retry_after, "Rate limit exceeded");
            AppError::RateLimited {
                key: key.to_string(),
                retry_after,
            }
        })
    }

    /// Drops keys whose windows are empty at `now`.
    ///
    /// Runs automatically every [`PURGE_INTERVAL`] decisions. Admission
    /// decisions are unaffected.
    pub fn purge_idle(&self, now: Instant) {
        let window = self.config.window;
        self.windows.retain(|_, timestamps| {
            prune(timestamps, now, window);
            !timestamps.is_empty()
        });
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Returns `Err(retry_after)` when the key is over its limit.
    fn try_admit(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let decision = self.decide(key, now);

        // The entry guard is released by now; retain locks every shard.
        if (self.decisions.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_INTERVAL == 0 {
            self.purge_idle(now);
        }

        decision
    }

    fn decide(&self, key: &str, now: Instant) -> Result<(), Duration> {
        if self.config.limit == 0 {
            return Err(self.config.window);
        }

        let mut timestamps = self.windows.entry(key.to_owned()).or_default();

        prune(&mut timestamps, now, self.config.window);

        if timestamps.len() >= self.config.limit as usize {
            let retry_after = timestamps
                .front()
                .map(|oldest| (*oldest + self.config.window).saturating_duration_since(now))
                .unwrap_or(self.config.window);
            return Err(retry_after);
        }

        timestamps.push_back(now);
        Ok(())
    }
}

/// Removes timestamps that are at least `window` old.
fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
