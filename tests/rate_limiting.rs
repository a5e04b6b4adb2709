mod common;

use common::TestCore;
use std::time::{Duration, Instant};
use url_shortener_core::prelude::*;

#[tokio::test]
async fn test_creation_budget_is_per_client() {
    let core = TestCore::with_limits(RateLimitConfig::per_minute(3));

    for i in 0..3 {
        core.shortener
            .create_short_link("client-a", &format!("https://example.com/{i}"), None)
            .await
            .unwrap();
    }

    let rejected = core
        .shortener
        .create_short_link("client-a", "https://example.com/over", None)
        .await;
    match rejected {
        Err(AppError::RateLimited { key, retry_after }) => {
            assert_eq!(key, "client-a");
            assert!(retry_after <= Duration::from_secs(60));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }

    // Another client is unaffected.
    core.shortener
        .create_short_link("client-b", "https://example.com/b", None)
        .await
        .unwrap();

    assert_eq!(core.links.len().await, 4);
}

#[tokio::test]
async fn test_rate_limited_creation_writes_nothing() {
    let core = TestCore::with_limits(RateLimitConfig::per_minute(0));

    let result = core
        .shortener
        .create_short_link("client", "https://example.com", None)
        .await;

    assert!(matches!(result, Err(AppError::RateLimited { .. })));
    assert!(core.links.is_empty().await);
}

#[tokio::test]
async fn test_resolution_has_its_own_budget() {
    let core = TestCore::with_limits(RateLimitConfig::per_minute(2));
    let link = core
        .shortener
        .create_short_link("client", "https://example.com", None)
        .await
        .unwrap();

    core.shortener
        .resolve_short_link("client", &link.code)
        .await
        .unwrap();
    core.shortener
        .resolve_short_link("client", &link.code)
        .await
        .unwrap();

    let result = core.shortener.resolve_short_link("client", &link.code).await;
    assert!(matches!(result, Err(AppError::RateLimited { .. })));

    // One creation was spent, one remains.
    core.shortener
        .create_short_link("client", "https://example.com/2", None)
        .await
        .unwrap();
}

#[test]
fn test_limit_admits_then_rejects_then_resumes() {
    let limit = 5;
    let window = Duration::from_secs(30);
    let limiter = RateLimiter::new(RateLimitConfig::new(limit, window));
    let start = Instant::now();

    for i in 0..limit {
        assert!(limiter.admit_at("client", start + Duration::from_millis(u64::from(i))));
    }
    assert!(!limiter.admit_at("client", start + Duration::from_secs(1)));
    assert!(!limiter.admit_at("client", start + Duration::from_secs(29)));

    assert!(limiter.admit_at("client", start + window + Duration::from_millis(10)));
}
