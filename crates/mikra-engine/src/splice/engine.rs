//! Splice orchestration
//!
//! One invocation owns exactly one unit of work, run as four strictly
//! sequential phases: (1) mutate content per edition, (2) cascade-rewrite
//! dependent records, (3) refresh cached structural state, (4) fire
//! search re-index/delete triggers. There is no transactional rollback;
//! a failure mid-cascade leaves a logged, partially-applied result, and
//! re-running the same anchor/mode is a no-op over already-correct
//! records.

use chrono::Utc;
use mikra_core::errors::{MikraError, Result};
use mikra_core::model::{Content, Version};
use mikra_core::ops::{content_ops, Library};
use mikra_core::RefCache;
use serde::Serialize;

use super::context::SpliceContext;
use super::rules::RewriteRule;
use super::{RunMode, SpliceMode, SpliceOptions};
use crate::cascade::{self, Patch};
use crate::refresh::{self, SearchIndexer};

/// One edition's planned or applied content change
#[derive(Debug, Clone, Serialize)]
pub struct ContentChange {
    pub title: String,
    pub edition_title: String,
    pub language: String,
    pub description: String,
}

/// One dependent record's planned or applied citation rewrite
#[derive(Debug, Clone, Serialize)]
pub struct RecordRewrite {
    pub kind: &'static str,
    pub record_id: String,
    pub from: String,
    pub to: String,
}

impl RecordRewrite {
    fn from_patch(patch: &Patch) -> Self {
        Self {
            kind: patch.kind.label(),
            record_id: patch.record_id.clone(),
            from: patch.from.clone(),
            to: patch.to.clone(),
        }
    }
}

/// One search-engine trigger target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexTarget {
    pub citation: String,
    pub edition_title: String,
    pub language: String,
}

/// Every decision of one splice invocation
///
/// In report mode this is the whole output; in execute mode it describes
/// what was done.
#[derive(Debug, Clone, Serialize)]
pub struct SpliceReport {
    pub anchor: String,
    pub book: String,
    pub mode: SpliceMode,
    pub run: RunMode,
    pub content_changes: Vec<ContentChange>,
    pub rewrites: Vec<RecordRewrite>,
    /// Citations the cascade could not parse or rewrite, left untouched
    pub skipped: u32,
    pub refreshed: Vec<String>,
    pub reindexed: Vec<IndexTarget>,
    pub deleted_units: Vec<IndexTarget>,
}

impl SpliceReport {
    fn new(ctx: &SpliceContext, options: SpliceOptions) -> Self {
        Self {
            anchor: ctx.anchor.normalize(),
            book: ctx.book.clone(),
            mode: ctx.mode,
            run: options.run,
            content_changes: Vec::new(),
            rewrites: Vec::new(),
            skipped: 0,
            refreshed: Vec::new(),
            reindexed: Vec::new(),
            deleted_units: Vec::new(),
        }
    }
}

impl std::fmt::Display for SpliceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            SpliceMode::Join => "join",
            SpliceMode::InsertAfter => "insert",
        };
        let run = match self.run {
            RunMode::Report => "report",
            RunMode::Execute => "execute",
        };
        writeln!(f, "{} at {} ({})", mode, self.anchor, run)?;
        for change in &self.content_changes {
            writeln!(
                f,
                "  content [{} / {} / {}]: {}",
                change.title, change.edition_title, change.language, change.description
            )?;
        }
        for rewrite in &self.rewrites {
            writeln!(
                f,
                "  rewrite {} {}: {} -> {}",
                rewrite.kind, rewrite.record_id, rewrite.from, rewrite.to
            )?;
        }
        for title in &self.refreshed {
            writeln!(f, "  refresh {}", title)?;
        }
        for target in &self.reindexed {
            writeln!(
                f,
                "  reindex {} [{} / {}]",
                target.citation, target.edition_title, target.language
            )?;
        }
        for target in &self.deleted_units {
            writeln!(
                f,
                "  delete {} [{} / {}]",
                target.citation, target.edition_title, target.language
            )?;
        }
        writeln!(f, "  skipped: {}", self.skipped)
    }
}

/// Merge the anchor segment with the following segment
pub fn join(
    lib: &mut Library,
    cache: &mut RefCache,
    indexer: &mut dyn SearchIndexer,
    anchor: &str,
    options: SpliceOptions,
) -> Result<SpliceReport> {
    splice(lib, cache, indexer, anchor, SpliceMode::Join, options)
}

/// Merge the preceding segment into the anchor segment
///
/// Equivalent to a `join` anchored one segment earlier.
pub fn join_previous(
    lib: &mut Library,
    cache: &mut RefCache,
    indexer: &mut dyn SearchIndexer,
    anchor: &str,
    options: SpliceOptions,
) -> Result<SpliceReport> {
    let r = cache.parse(lib, anchor)?;
    let previous = r
        .previous_segment()
        .ok_or_else(|| MikraError::NoPrecedingSegment {
            citation: r.normalize(),
        })?;
    splice(
        lib,
        cache,
        indexer,
        &previous.normalize(),
        SpliceMode::Join,
        options,
    )
}

/// Open a new empty segment immediately after the anchor
pub fn insert_after(
    lib: &mut Library,
    cache: &mut RefCache,
    indexer: &mut dyn SearchIndexer,
    anchor: &str,
    options: SpliceOptions,
) -> Result<SpliceReport> {
    splice(lib, cache, indexer, anchor, SpliceMode::InsertAfter, options)
}

/// Run one splice invocation
pub fn splice(
    lib: &mut Library,
    cache: &mut RefCache,
    indexer: &mut dyn SearchIndexer,
    anchor: &str,
    mode: SpliceMode,
    options: SpliceOptions,
) -> Result<SpliceReport> {
    let ctx = SpliceContext::resolve(lib, cache, anchor, mode)?;
    let execute = options.run == RunMode::Execute;
    let mut report = SpliceReport::new(&ctx, options);

    // Phase 1: content mutation, independently per edition
    mutate_content(lib, &ctx, execute, &mut report);
    if execute {
        for title in ctx.affected_titles() {
            cache.invalidate(&title);
        }
    }

    // Phase 2: cascade rewrite of dependent records
    let rules = build_rules(&ctx);
    let scan = cascade::scan(lib, &rules);
    report.skipped = scan.skipped;
    report.rewrites = scan.patches.iter().map(RecordRewrite::from_patch).collect();
    if execute {
        cascade::apply(lib, &scan.patches);
    }

    // Phase 3: refresh cached structural state
    if !options.bulk {
        for title in ctx.affected_titles() {
            report.refreshed.push(title.clone());
            if execute {
                if let Err(err) = refresh::refresh(lib, cache, &title) {
                    tracing::warn!(
                        component = module_path!(),
                        book = title.as_str(),
                        err = %err,
                        "state refresh failed; content mutation and cascade stand"
                    );
                }
            }
        }
    }

    // Phase 4: search engine triggers
    if !options.bulk {
        collect_index_targets(lib, &ctx, &mut report);
        if execute {
            for target in &report.reindexed {
                indexer.reindex(&target.citation, &target.edition_title, &target.language);
            }
            for target in &report.deleted_units {
                indexer.delete_unit(&target.citation, &target.edition_title, &target.language);
            }
        }
    }

    Ok(report)
}

fn build_rules(ctx: &SpliceContext) -> Vec<RewriteRule<'_>> {
    let mut rules = vec![RewriteRule::base(ctx)];
    for title in &ctx.commentary_titles {
        rules.push(RewriteRule::commentary(ctx, title.clone()));
    }
    rules
}

fn mutate_content(lib: &mut Library, ctx: &SpliceContext, execute: bool, report: &mut SpliceReport) {
    for title in ctx.affected_titles() {
        let commentary = title != ctx.book;
        let pad_to = ctx
            .comment_section_lengths
            .get(&title)
            .copied()
            .unwrap_or(0);

        for version in lib.versions_of_mut(&title) {
            let change = match ctx.mode {
                SpliceMode::Join if commentary => {
                    join_comment_groups(version, ctx, pad_to, execute)
                }
                SpliceMode::Join => join_segments(version, ctx, execute),
                SpliceMode::InsertAfter => insert_slot(version, ctx, commentary, execute),
            };

            if let Some(description) = change {
                report.content_changes.push(ContentChange {
                    title: title.clone(),
                    edition_title: version.edition_title.clone(),
                    language: version.language.clone(),
                    description,
                });
                if execute {
                    version.updated_at = Utc::now();
                }
            }
        }
    }
}

// Base layer join: string concatenation with a separating space, then
// remove the vacated slot. Editions without a following segment are
// untouched.
fn join_segments(version: &mut Version, ctx: &SpliceContext, execute: bool) -> Option<String> {
    let children = content_ops::section_children_mut(&mut version.content, &ctx.section_path)?;
    let idx = (ctx.position - 1) as usize;
    if children.len() <= idx + 1 {
        return None;
    }

    let first = children[idx].text()?.to_string();
    let second = children[idx + 1].text()?.to_string();
    let description = format!("merge segments {} and {}", ctx.position, ctx.position + 1);

    if execute {
        children[idx] = Content::leaf(join_text(&first, &second));
        children.remove(idx + 1);
    }
    Some(description)
}

// Commentary layer join: the anchor segment's comment group is
// right-padded with empty placeholders up to the precomputed comment
// section length before the next group's comments append, so comment
// indexes land at deterministic offsets in every edition.
fn join_comment_groups(
    version: &mut Version,
    ctx: &SpliceContext,
    pad_to: u32,
    execute: bool,
) -> Option<String> {
    let children = content_ops::section_children_mut(&mut version.content, &ctx.section_path)?;
    let idx = (ctx.position - 1) as usize;
    if children.len() <= idx + 1 {
        return None;
    }

    let appended = children[idx + 1].len();
    let description = format!(
        "merge comment groups {} and {} ({} comments appended at offset {})",
        ctx.position,
        ctx.position + 1,
        appended,
        pad_to
    );

    if execute {
        let removed = children.remove(idx + 1);
        let mut group = std::mem::replace(&mut children[idx], Content::empty_node()).into_children();
        while (group.len() as u32) < pad_to {
            group.push(Content::empty_leaf());
        }
        group.extend(removed.into_children());
        children[idx] = Content::node(group);
    }
    Some(description)
}

// Insert: splice one empty slot after the anchor position. Editions
// shorter than the insertion point have nothing to shift and are
// untouched.
fn insert_slot(
    version: &mut Version,
    ctx: &SpliceContext,
    commentary: bool,
    execute: bool,
) -> Option<String> {
    let children = content_ops::section_children_mut(&mut version.content, &ctx.section_path)?;
    let idx = ctx.position as usize;
    if children.len() < idx + 1 {
        return None;
    }

    let description = format!("insert empty slot at {}", ctx.position + 1);
    if execute {
        let filler = if commentary {
            Content::empty_node()
        } else {
            Content::empty_leaf()
        };
        children.insert(idx, filler);
    }
    Some(description)
}

fn join_text(first: &str, second: &str) -> String {
    if first.is_empty() {
        second.to_string()
    } else if second.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, second)
    }
}

// Re-index the anchor section of every edition of every affected title;
// on join, also delete the now-dangling trailing unit of each section.
fn collect_index_targets(lib: &Library, ctx: &SpliceContext, report: &mut SpliceReport) {
    for title in ctx.affected_titles() {
        let section_citation = match ctx.citation_for(lib, &title, &ctx.section_path) {
            Ok(citation) => citation,
            Err(err) => {
                tracing::warn!(
                    component = module_path!(),
                    book = title.as_str(),
                    err = %err,
                    "could not render section citation; skipping index triggers"
                );
                continue;
            }
        };

        let trailing_citation = if ctx.mode == SpliceMode::Join {
            let old_len = ctx.section_lengths.get(&title).copied().unwrap_or(0);
            if old_len > 0 {
                let mut trailing = ctx.section_path.clone();
                trailing.push(old_len);
                ctx.citation_for(lib, &title, &trailing).ok()
            } else {
                None
            }
        } else {
            None
        };

        for version in lib.versions_of(&title) {
            report.reindexed.push(IndexTarget {
                citation: section_citation.clone(),
                edition_title: version.edition_title.clone(),
                language: version.language.clone(),
            });
            if let Some(citation) = &trailing_citation {
                report.deleted_units.push(IndexTarget {
                    citation: citation.clone(),
                    edition_title: version.edition_title.clone(),
                    language: version.language.clone(),
                });
            }
        }
    }
}
