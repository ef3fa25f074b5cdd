//! Dependent-reference rewriter
//!
//! One generic routine scans every address-bearing location in the
//! library, tests each embedded citation against the splice's rewrite
//! rules, and patches the ones that match. The set of locations is a
//! declarative table: adding a new dependent record kind means adding a
//! table row and its slot accessor arm, not a new code path.
//!
//! Per-record failures (an unparseable citation, address arithmetic out
//! of range) are logged and skipped; the scan always runs to completion
//! over the remaining records. The predicate is address-range-based, so
//! re-running a scan over already-rewritten records is a no-op.

use chrono::Utc;
use mikra_core::citation::parser::{self, ParseOpts};
use mikra_core::errors::Result;
use mikra_core::model::{HistoryRecord, OutlineNode, SheetNode};
use mikra_core::ops::Library;
use mikra_core_types::schema;
use serde::Serialize;

use crate::splice::rules::RewriteRule;

/// Dependent record kinds the cascade covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    Link,
    Note,
    TranslationRequest,
    History,
    Outline,
    Sheet,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Link => "link",
            RecordKind::Note => "note",
            RecordKind::TranslationRequest => "translation_request",
            RecordKind::History => "history",
            RecordKind::Outline => "outline",
            RecordKind::Sheet => "sheet",
        }
    }
}

/// Location of citation data within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// Top-level field
    Field(&'static str),
    /// Field inside a sub-object, one level of nesting
    Nested(&'static str, &'static str),
}

/// One row of the cascade table
#[derive(Debug, Clone, Copy)]
pub struct RewriteTarget {
    pub kind: RecordKind,
    pub path: FieldPath,
    pub is_list: bool,
}

/// Every address-bearing location in the library
pub const REWRITE_TARGETS: &[RewriteTarget] = &[
    RewriteTarget {
        kind: RecordKind::Link,
        path: FieldPath::Field("refs"),
        is_list: true,
    },
    RewriteTarget {
        kind: RecordKind::Note,
        path: FieldPath::Field("citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::TranslationRequest,
        path: FieldPath::Field("citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::History,
        path: FieldPath::Field("citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::History,
        path: FieldPath::Nested("new", "citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::History,
        path: FieldPath::Nested("new", "citations"),
        is_list: true,
    },
    RewriteTarget {
        kind: RecordKind::History,
        path: FieldPath::Nested("old", "citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::History,
        path: FieldPath::Nested("old", "citations"),
        is_list: true,
    },
    RewriteTarget {
        kind: RecordKind::Outline,
        path: FieldPath::Field("whole_citation"),
        is_list: false,
    },
    RewriteTarget {
        kind: RecordKind::Outline,
        path: FieldPath::Field("citations"),
        is_list: true,
    },
    RewriteTarget {
        kind: RecordKind::Sheet,
        path: FieldPath::Field("citation"),
        is_list: false,
    },
];

/// Exact slot a patch writes back to
#[derive(Debug, Clone)]
pub enum SlotRef {
    Link {
        id: String,
        slot: usize,
    },
    Note {
        id: String,
    },
    TranslationRequest {
        id: String,
    },
    History {
        id: String,
        path: FieldPath,
        item: Option<usize>,
    },
    Outline {
        title: String,
        node: usize,
        path: FieldPath,
        item: Option<usize>,
    },
    Sheet {
        id: String,
        node_path: Vec<usize>,
    },
}

/// One planned citation rewrite
#[derive(Debug, Clone)]
pub struct Patch {
    pub slot: SlotRef,
    pub kind: RecordKind,
    pub record_id: String,
    pub from: String,
    pub to: String,
}

/// Result of a cascade scan: planned patches plus skip count
#[derive(Debug, Default)]
pub struct CascadeScan {
    pub patches: Vec<Patch>,
    pub skipped: u32,
}

/// Scan every table row and compute the patches the rules demand
///
/// Pure with respect to the library; record maps are iterated in stable
/// creation order, which fixes the relative order of citations anchored
/// at the same joined boundary.
pub fn scan(lib: &Library, rules: &[RewriteRule<'_>]) -> CascadeScan {
    let mut out = CascadeScan::default();

    for target in REWRITE_TARGETS {
        match target.kind {
            RecordKind::Link => {
                for link in lib.links() {
                    for (slot, raw) in link.refs.iter().enumerate() {
                        consider(
                            lib,
                            rules,
                            raw,
                            target.kind,
                            &link.id,
                            SlotRef::Link {
                                id: link.id.clone(),
                                slot,
                            },
                            &mut out,
                        );
                    }
                }
            }
            RecordKind::Note => {
                for note in lib.notes() {
                    consider(
                        lib,
                        rules,
                        &note.citation,
                        target.kind,
                        &note.id,
                        SlotRef::Note {
                            id: note.id.clone(),
                        },
                        &mut out,
                    );
                }
            }
            RecordKind::TranslationRequest => {
                for request in lib.translation_requests() {
                    consider(
                        lib,
                        rules,
                        &request.citation,
                        target.kind,
                        &request.id,
                        SlotRef::TranslationRequest {
                            id: request.id.clone(),
                        },
                        &mut out,
                    );
                }
            }
            RecordKind::History => {
                for record in lib.history() {
                    for (item, raw) in history_slot_values(record, &target.path) {
                        consider(
                            lib,
                            rules,
                            raw,
                            target.kind,
                            &record.id,
                            SlotRef::History {
                                id: record.id.clone(),
                                path: target.path,
                                item,
                            },
                            &mut out,
                        );
                    }
                }
            }
            RecordKind::Outline => {
                for (title, nodes) in lib.outlines() {
                    for (node_idx, node) in nodes.iter().enumerate() {
                        for (item, raw) in outline_slot_values(node, &target.path) {
                            consider(
                                lib,
                                rules,
                                raw,
                                target.kind,
                                title,
                                SlotRef::Outline {
                                    title: title.clone(),
                                    node: node_idx,
                                    path: target.path,
                                    item,
                                },
                                &mut out,
                            );
                        }
                    }
                }
            }
            RecordKind::Sheet => {
                for sheet in lib.sheets() {
                    let mut slots = Vec::new();
                    let mut prefix = Vec::new();
                    collect_sheet_slots(&sheet.sources, &mut prefix, &mut slots);
                    for (node_path, raw) in slots {
                        consider(
                            lib,
                            rules,
                            raw,
                            target.kind,
                            &sheet.id,
                            SlotRef::Sheet {
                                id: sheet.id.clone(),
                                node_path,
                            },
                            &mut out,
                        );
                    }
                }
            }
        }
    }

    out
}

/// Apply planned patches to the library
///
/// A patch whose record vanished mid-cascade is logged and skipped;
/// the remaining patches still apply.
pub fn apply(lib: &mut Library, patches: &[Patch]) {
    for patch in patches {
        if let Err(err) = apply_one(lib, patch) {
            tracing::warn!(
                component = module_path!(),
                event = schema::EVENT_CASCADE_SKIP,
                record_kind = patch.kind.label(),
                record_id = patch.record_id.as_str(),
                citation = patch.from.as_str(),
                err = %err,
                "record vanished before patch applied"
            );
        }
    }
}

// Test one citation string against the rules; at most one rule matches
// since each rule targets a distinct book title.
#[allow(clippy::too_many_arguments)]
fn consider(
    lib: &Library,
    rules: &[RewriteRule<'_>],
    raw: &str,
    kind: RecordKind,
    record_id: &str,
    slot: SlotRef,
    out: &mut CascadeScan,
) {
    // Unpadded parse: a whole-section citation must keep its whole-section
    // intent rather than collapse to its first segment.
    let parsed = match parser::parse_with(lib, raw, ParseOpts::unpadded()) {
        Ok(r) => r,
        Err(err) => {
            tracing::debug!(
                component = module_path!(),
                event = schema::EVENT_CASCADE_SKIP,
                record_kind = kind.label(),
                record_id = record_id,
                citation = raw,
                err = %err,
                "citation did not parse; left untouched"
            );
            out.skipped += 1;
            return;
        }
    };

    for rule in rules {
        if !rule.needs_rewrite(&parsed) {
            continue;
        }
        match rule.rewrite(&parsed) {
            Ok(rewritten) => {
                out.patches.push(Patch {
                    slot,
                    kind,
                    record_id: record_id.to_string(),
                    from: raw.to_string(),
                    to: rewritten.normalize(),
                });
            }
            Err(err) => {
                tracing::warn!(
                    component = module_path!(),
                    event = schema::EVENT_CASCADE_SKIP,
                    record_kind = kind.label(),
                    record_id = record_id,
                    citation = raw,
                    err = %err,
                    "address arithmetic failed; left untouched"
                );
                out.skipped += 1;
            }
        }
        return;
    }
}

fn apply_one(lib: &mut Library, patch: &Patch) -> Result<()> {
    match &patch.slot {
        SlotRef::Link { id, slot } => {
            let link = lib.get_link_mut(id)?;
            link.refs[*slot] = patch.to.clone();
            link.updated_at = Utc::now();
        }
        SlotRef::Note { id } => {
            let note = lib.get_note_mut(id)?;
            note.citation = patch.to.clone();
            note.updated_at = Utc::now();
        }
        SlotRef::TranslationRequest { id } => {
            let request = lib.get_translation_request_mut(id)?;
            request.citation = patch.to.clone();
            request.updated_at = Utc::now();
        }
        SlotRef::History { id, path, item } => {
            let record = lib.get_history_mut(id)?;
            set_history_slot(record, path, *item, &patch.to);
            record.updated_at = Utc::now();
        }
        SlotRef::Outline {
            title,
            node,
            path,
            item,
        } => {
            if let Some(target) = lib
                .outline_nodes_mut(title)
                .and_then(|nodes| nodes.get_mut(*node))
            {
                set_outline_slot(target, path, *item, &patch.to);
            }
        }
        SlotRef::Sheet { id, node_path } => {
            let sheet = lib.get_sheet_mut(id)?;
            if let Some(node) = sheet_node_mut(&mut sheet.sources, node_path) {
                node.citation = Some(patch.to.clone());
                sheet.updated_at = Utc::now();
            }
        }
    }
    Ok(())
}

fn history_slot_values<'a>(
    record: &'a HistoryRecord,
    path: &FieldPath,
) -> Vec<(Option<usize>, &'a str)> {
    match path {
        FieldPath::Field("citation") => record
            .citation
            .iter()
            .map(|s| (None, s.as_str()))
            .collect(),
        FieldPath::Nested("new", "citation") => record
            .new
            .iter()
            .filter_map(|state| state.citation.as_deref())
            .map(|s| (None, s))
            .collect(),
        FieldPath::Nested("new", "citations") => record
            .new
            .iter()
            .filter_map(|state| state.citations.as_ref())
            .flat_map(|list| {
                list.iter()
                    .enumerate()
                    .map(|(i, s)| (Some(i), s.as_str()))
            })
            .collect(),
        FieldPath::Nested("old", "citation") => record
            .old
            .iter()
            .filter_map(|state| state.citation.as_deref())
            .map(|s| (None, s))
            .collect(),
        FieldPath::Nested("old", "citations") => record
            .old
            .iter()
            .filter_map(|state| state.citations.as_ref())
            .flat_map(|list| {
                list.iter()
                    .enumerate()
                    .map(|(i, s)| (Some(i), s.as_str()))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn set_history_slot(record: &mut HistoryRecord, path: &FieldPath, item: Option<usize>, value: &str) {
    match path {
        FieldPath::Field("citation") => {
            record.citation = Some(value.to_string());
        }
        FieldPath::Nested("new", "citation") => {
            if let Some(state) = record.new.as_mut() {
                state.citation = Some(value.to_string());
            }
        }
        FieldPath::Nested("new", "citations") => {
            if let (Some(state), Some(i)) = (record.new.as_mut(), item) {
                if let Some(slot) = state.citations.as_mut().and_then(|list| list.get_mut(i)) {
                    *slot = value.to_string();
                }
            }
        }
        FieldPath::Nested("old", "citation") => {
            if let Some(state) = record.old.as_mut() {
                state.citation = Some(value.to_string());
            }
        }
        FieldPath::Nested("old", "citations") => {
            if let (Some(state), Some(i)) = (record.old.as_mut(), item) {
                if let Some(slot) = state.citations.as_mut().and_then(|list| list.get_mut(i)) {
                    *slot = value.to_string();
                }
            }
        }
        _ => {}
    }
}

fn outline_slot_values<'a>(
    node: &'a OutlineNode,
    path: &FieldPath,
) -> Vec<(Option<usize>, &'a str)> {
    match path {
        FieldPath::Field("whole_citation") => node
            .whole_citation
            .iter()
            .map(|s| (None, s.as_str()))
            .collect(),
        FieldPath::Field("citations") => node
            .citations
            .iter()
            .enumerate()
            .map(|(i, s)| (Some(i), s.as_str()))
            .collect(),
        _ => Vec::new(),
    }
}

fn set_outline_slot(node: &mut OutlineNode, path: &FieldPath, item: Option<usize>, value: &str) {
    match path {
        FieldPath::Field("whole_citation") => {
            node.whole_citation = Some(value.to_string());
        }
        FieldPath::Field("citations") => {
            if let Some(slot) = item.and_then(|i| node.citations.get_mut(i)) {
                *slot = value.to_string();
            }
        }
        _ => {}
    }
}

// Recursive descent through a sheet's source tree.
fn collect_sheet_slots<'a>(
    nodes: &'a [SheetNode],
    prefix: &mut Vec<usize>,
    out: &mut Vec<(Vec<usize>, &'a str)>,
) {
    for (i, node) in nodes.iter().enumerate() {
        prefix.push(i);
        if let Some(citation) = &node.citation {
            out.push((prefix.clone(), citation.as_str()));
        }
        collect_sheet_slots(&node.children, prefix, out);
        prefix.pop();
    }
}

fn sheet_node_mut<'a>(nodes: &'a mut [SheetNode], path: &[usize]) -> Option<&'a mut SheetNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        sheet_node_mut(&mut node.children, rest)
    }
}
