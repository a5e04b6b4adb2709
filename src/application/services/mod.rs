//! Business logic services for the application layer.

pub mod analytics_aggregator;
pub mod click_recorder;
pub mod shortener_service;

pub use analytics_aggregator::{AnalyticsAggregator, CountryCount, Summary};
pub use click_recorder::ClickRecorder;
pub use shortener_service::ShortenerService;
