//! Logging facility
//!
//! One initialization point plus canonical operation-logging macros, so
//! every layer logs with the same structured fields.

mod init;
mod macros;

pub use init::{init, Profile};
