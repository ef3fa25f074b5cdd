//! Core types shared across Mikra facilities
//!
//! This crate provides foundational types used by the logging and error
//! reporting facilities of the library engine:
//!
//! - **Correlation types**: RequestId, OpContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{OpContext, RequestId};
