//! Structural splice: join or insert a segment and keep the library
//! consistent.

pub mod context;
pub mod engine;
pub mod rules;

use serde::Serialize;

pub use context::SpliceContext;
pub use engine::{
    insert_after, join, join_previous, splice, ContentChange, IndexTarget, RecordRewrite,
    SpliceReport,
};
pub use rules::{Layer, RewriteRule};

/// The two structural edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpliceMode {
    /// Merge the anchor segment with the following segment
    Join,
    /// Open a new empty segment immediately after the anchor
    InsertAfter,
}

/// Whether an invocation mutates or only reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunMode {
    /// Compute every decision, make zero mutations
    Report,
    /// Mutate content and cascade
    Execute,
}

/// Per-invocation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpliceOptions {
    pub run: RunMode,
    /// Skip the refresh and re-index phases so many splices can be queued
    /// and refreshed once at the end
    pub bulk: bool,
}

impl SpliceOptions {
    pub fn report() -> Self {
        Self {
            run: RunMode::Report,
            bulk: false,
        }
    }

    pub fn execute() -> Self {
        Self {
            run: RunMode::Execute,
            bulk: false,
        }
    }

    pub fn bulk() -> Self {
        Self {
            run: RunMode::Execute,
            bulk: true,
        }
    }
}

impl Default for SpliceOptions {
    fn default() -> Self {
        Self::execute()
    }
}
