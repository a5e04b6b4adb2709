//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL link storage
//! - [`PgClickRepository`] - PostgreSQL click event storage
//! - [`InMemoryLinkRepository`] / [`InMemoryClickRepository`] - process-local stores
//!
//! The PostgreSQL schema lives in `migrations/` and is applied with
//! [`sqlx::migrate!`].

pub mod memory;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory::{InMemoryClickRepository, InMemoryLinkRepository};
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
