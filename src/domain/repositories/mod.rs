//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store the core runs against. They are
//! implemented by the adapters in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Keyed create/fetch/update over short links
//! - [`ClickRepository`] - Append/query over click events
//!
//! # Testing
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.
//! See integration tests in `tests/repository_*.rs` for the PostgreSQL adapters.

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
