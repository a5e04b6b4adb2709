//! PostgreSQL link repository tests. Require `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use url_shortener_core::domain::entities::NewLink;
use url_shortener_core::domain::repositories::LinkRepository;
use url_shortener_core::error::AppError;
use url_shortener_core::infrastructure::persistence::PgLinkRepository;

fn new_link(code: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        long_url: "https://example.com".to_string(),
        expires_at: None,
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link("test1234")).await.unwrap();

    assert_eq!(link.code, "test1234");
    assert_eq!(link.long_url, "https://example.com");
    assert!(link.expires_at.is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("dupe1234")).await.unwrap();

    let result = repo.create(new_link("dupe1234")).await;

    match result {
        Err(AppError::Conflict { constraint }) => assert_eq!(constraint, "links_code_key"),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_by_code_and_id(pool: PgPool) {
    let id = common::insert_link(&pool, "abc12345", "https://example.com/x", None).await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let by_code = repo.find_by_code("abc12345").await.unwrap().unwrap();
    let by_id = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(by_code, by_id);
    assert_eq!(by_code.long_url, "https://example.com/x");
    assert!(repo.find_by_code("notfound").await.unwrap().is_none());
    assert!(repo.find_by_id(id + 1000).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_returns_expired_links(pool: PgPool) {
    let past = Utc::now() - Duration::hours(1);
    common::insert_link(&pool, "expired1", "https://example.com", Some(past)).await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("expired1").await.unwrap().unwrap();

    assert!(link.is_expired());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_set_expiration(pool: PgPool) {
    common::insert_link(&pool, "expire12", "https://example.com", None).await;
    let repo = PgLinkRepository::new(Arc::new(pool));
    let past = Utc::now() - Duration::hours(1);

    let updated = repo
        .set_expiration("expire12", Some(past))
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_expired());

    let missing = repo.set_expiration("missing1", Some(past)).await.unwrap();
    assert!(missing.is_none());
}
