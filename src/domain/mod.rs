//! Domain layer containing business entities and logic.
//!
//! Defines the entities, the store contracts and the classification rules the
//! application layer builds on. Nothing here depends on a concrete store.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`device`] - User-Agent to device family classification
//! - [`geo`] - Geolocation contract and the no-backend locator
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure
//! - Repository and locator traits are implemented in [`crate::infrastructure`]

pub mod device;
pub mod entities;
pub mod geo;
pub mod repositories;
