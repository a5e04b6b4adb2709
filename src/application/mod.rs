//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, rate limiting and classification. Services consume repository
//! traits and expose the operations an outer transport would call.
//!
//! # Available Services
//!
//! - [`services::ShortenerService`] - Short link creation, resolution and forced expiry
//! - [`services::ClickRecorder`] - Click classification and persistence
//! - [`services::AnalyticsAggregator`] - Per-link click summaries
//! - [`geo_fence::GeoFence`] - Country restriction on resolution
//! - [`rate_limiter::RateLimiter`] - Per-client sliding-window admission
//! - [`click_queue::run_click_worker`] - Channel-fed click recording

pub mod click_queue;
pub mod geo_fence;
pub mod rate_limiter;
pub mod services;
