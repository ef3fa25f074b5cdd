//! Mikra Engine - structural splice orchestration
//!
//! Coordinates a structural edit (join or insert) across every edition of
//! a base book and its commentary layers, then rewrites every dependent
//! record whose embedded citation the edit invalidated:
//! - Splice engine with report/execute modes and a bulk variant
//! - Generic, table-driven dependent-reference rewriter
//! - State refresher and search re-index trigger interface
//! - Engine command layer with operation logging

pub mod cascade;
pub mod commands;
pub mod refresh;
pub mod splice;

pub use commands::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use refresh::{refresh, IndexerCall, NoopIndexer, RecordingIndexer, SearchIndexer};
pub use splice::{
    insert_after, join, join_previous, splice, RunMode, SpliceContext, SpliceMode, SpliceOptions,
    SpliceReport,
};
