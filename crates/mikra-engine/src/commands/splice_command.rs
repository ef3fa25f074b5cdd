//! Engine-level splice commands.
//!
//! Orchestration-layer entry points log with `log_op_start!` /
//! `log_op_end!` / `log_op_error!`; lower layers use only
//! `tracing::debug!()` for internal details.

use std::time::Instant;

use mikra_core::errors::Result;
use mikra_core::{log_op_end, log_op_error, log_op_start, Library, RefCache};
use mikra_core_types::OpContext;

use crate::refresh::SearchIndexer;
use crate::splice::{self, SpliceOptions, SpliceReport};

/// Engine-level structural edit commands
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Merge the anchor segment with the following segment
    SpliceJoin {
        anchor: String,
        options: SpliceOptions,
    },
    /// Merge the preceding segment into the anchor segment
    SpliceJoinPrevious {
        anchor: String,
        options: SpliceOptions,
    },
    /// Open a new empty segment after the anchor
    SpliceInsertAfter {
        anchor: String,
        options: SpliceOptions,
    },
}

/// Result of applying an engine command
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Splice(SpliceReport),
}

/// Apply an engine command against the library
pub fn apply_engine_command(
    cmd: EngineCommand,
    lib: &mut Library,
    cache: &mut RefCache,
    indexer: &mut dyn SearchIndexer,
    op_ctx: &OpContext,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::SpliceJoin { anchor, options } => run("splice_join", &anchor, op_ctx, || {
            splice::join(lib, cache, indexer, &anchor, options)
        }),
        EngineCommand::SpliceJoinPrevious { anchor, options } => {
            run("splice_join_previous", &anchor, op_ctx, || {
                splice::join_previous(lib, cache, indexer, &anchor, options)
            })
        }
        EngineCommand::SpliceInsertAfter { anchor, options } => {
            run("splice_insert_after", &anchor, op_ctx, || {
                splice::insert_after(lib, cache, indexer, &anchor, options)
            })
        }
    }
}

fn run(
    op: &'static str,
    anchor: &str,
    op_ctx: &OpContext,
    f: impl FnOnce() -> Result<SpliceReport>,
) -> Result<EngineCommandResult> {
    log_op_start!(
        op,
        request_id = op_ctx.request_id.as_str(),
        anchor = anchor
    );
    let started = Instant::now();

    match f() {
        Ok(report) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            log_op_end!(
                op,
                duration_ms = duration_ms,
                request_id = op_ctx.request_id.as_str(),
                anchor = anchor,
                rewrites = report.rewrites.len() as u64,
                skipped = report.skipped
            );
            Ok(EngineCommandResult::Splice(report))
        }
        Err(err) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            log_op_error!(
                op,
                err,
                duration_ms = duration_ms,
                request_id = op_ctx.request_id.as_str(),
                anchor = anchor
            );
            Err(err)
        }
    }
}
