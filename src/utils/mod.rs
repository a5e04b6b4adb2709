//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation
//! - [`destination`] - Destination URL validation
//! - [`deadline`] - Timeouts around store and geo calls

pub mod code_generator;
pub mod deadline;
pub mod destination;
