//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic beyond simple
//! predicates.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping
//! - [`ClickEvent`] - A recorded visit to a shortened link
//! - [`DeviceType`] - Device family of the visiting client
//! - [`Summary`] - Aggregated clicks of one link
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! `NewLink` and `NewClickEvent` carry everything except the store-assigned id.

pub mod click;
pub mod link;
pub mod summary;

pub use click::{ClickEvent, DeviceType, NewClickEvent};
pub use link::{Link, NewLink};
pub use summary::{CountryCount, RECENT_EVENTS, Summary, TOP_COUNTRIES};
