//! Command orchestration layer.
//!
//! Wraps the splice engine in engine-level commands with canonical
//! operation logging and duration measurement.

pub mod splice_command;

pub use splice_command::{apply_engine_command, EngineCommand, EngineCommandResult};
