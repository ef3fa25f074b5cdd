use std::collections::{BTreeMap, HashMap, HashSet};

use crate::errors::{MikraError, Result};
use crate::model::{
    HistoryRecord, Index, Link, Note, OutlineNode, Sheet, TocEntry, TranslationRequest, Version,
};

/// In-memory store for the library
///
/// Single-threaded, no interior locking: the splice engine assumes
/// external coordination (administrative execution) and serializes all
/// access through one `&mut Library`. Record collections are keyed by
/// UUIDv7 ids in ordered maps so scans run in stable creation order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Structural definitions, keyed by canonical title
    indexes: HashMap<String, Index>,
    /// Alias/shorthand to the next name in its resolution chain
    alias_to_title: HashMap<String, String>,
    /// Editions per book title
    versions: HashMap<String, Vec<Version>>,
    /// Cached table-of-contents entries, regenerated by the refresher
    toc: HashMap<String, TocEntry>,

    links: BTreeMap<String, Link>,
    notes: BTreeMap<String, Note>,
    translation_requests: BTreeMap<String, TranslationRequest>,
    history: BTreeMap<String, HistoryRecord>,
    /// Outline / alt-structure nodes per book title
    outlines: BTreeMap<String, Vec<OutlineNode>>,
    sheets: BTreeMap<String, Sheet>,
}

impl Library {
    /// Create a new empty Library
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Indexes and titles =====

    /// Register a book's structural definition
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTitle` if the title or one of its aliases is
    /// already registered, and `BaseNotFound` if a commentary index names
    /// a base book the library does not hold.
    pub fn add_index(&mut self, index: Index) -> Result<()> {
        if self.indexes.contains_key(&index.title) || self.alias_to_title.contains_key(&index.title)
        {
            return Err(MikraError::DuplicateTitle {
                title: index.title.clone(),
            });
        }
        if let Some(base) = &index.base_title {
            if !self.indexes.contains_key(base) {
                return Err(MikraError::BaseNotFound {
                    title: index.title.clone(),
                    base: base.clone(),
                });
            }
        }
        for alias in &index.aliases {
            if self.indexes.contains_key(alias) || self.alias_to_title.contains_key(alias) {
                return Err(MikraError::DuplicateTitle {
                    title: alias.clone(),
                });
            }
        }

        for alias in &index.aliases {
            self.alias_to_title
                .insert(alias.clone(), index.title.clone());
        }
        self.indexes.insert(index.title.clone(), index);
        Ok(())
    }

    /// Get a book's structural definition
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if no index carries the title.
    pub fn get_index(&self, title: &str) -> Result<&Index> {
        self.indexes
            .get(title)
            .ok_or_else(|| MikraError::IndexNotFound {
                title: title.to_string(),
            })
    }

    /// Whether a canonical title is registered
    pub fn has_title(&self, title: &str) -> bool {
        self.indexes.contains_key(title)
    }

    /// Resolve a name to a canonical title, following aliases recursively
    ///
    /// Alias chains are followed with a cycle guard; a canonical title
    /// resolves to itself.
    pub fn resolve_title(&self, name: &str) -> Option<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = name;
        loop {
            if self.indexes.contains_key(current) {
                return Some(current.to_string());
            }
            if !seen.insert(current) {
                return None;
            }
            current = self.alias_to_title.get(current)?;
        }
    }

    /// Titles of all commentary layers anchored to a base book, sorted
    pub fn commentaries_on(&self, base_title: &str) -> Vec<String> {
        let mut titles: Vec<String> = self
            .indexes
            .values()
            .filter(|i| i.base_title.as_deref() == Some(base_title))
            .map(|i| i.title.clone())
            .collect();
        titles.sort();
        titles
    }

    // ===== Versions =====

    /// Add an edition of a book
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if the book has no registered index.
    pub fn add_version(&mut self, version: Version) -> Result<()> {
        if !self.indexes.contains_key(&version.title) {
            return Err(MikraError::IndexNotFound {
                title: version.title.clone(),
            });
        }
        self.versions
            .entry(version.title.clone())
            .or_default()
            .push(version);
        Ok(())
    }

    /// All editions of a book (empty if none)
    pub fn versions_of(&self, title: &str) -> &[Version] {
        self.versions.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable editions of a book (empty if none)
    pub fn versions_of_mut(&mut self, title: &str) -> &mut [Version] {
        self.versions
            .get_mut(title)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    /// One edition by title and edition title
    ///
    /// # Errors
    ///
    /// Returns `VersionNotFound` if the edition is absent.
    pub fn get_version(&self, title: &str, edition_title: &str) -> Result<&Version> {
        self.versions_of(title)
            .iter()
            .find(|v| v.edition_title == edition_title)
            .ok_or_else(|| MikraError::VersionNotFound {
                title: title.to_string(),
                edition: edition_title.to_string(),
            })
    }

    // ===== Table of contents =====

    pub fn set_toc_entry(&mut self, entry: TocEntry) {
        self.toc.insert(entry.title.clone(), entry);
    }

    pub fn toc_entry(&self, title: &str) -> Option<&TocEntry> {
        self.toc.get(title)
    }

    // ===== Dependent records =====

    pub fn insert_link(&mut self, link: Link) {
        self.links.insert(link.id.clone(), link);
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn get_link_mut(&mut self, id: &str) -> Result<&mut Link> {
        self.links.get_mut(id).ok_or_else(|| MikraError::RecordNotFound {
            record_id: id.to_string(),
        })
    }

    pub fn insert_note(&mut self, note: Note) {
        self.notes.insert(note.id.clone(), note);
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn get_note_mut(&mut self, id: &str) -> Result<&mut Note> {
        self.notes.get_mut(id).ok_or_else(|| MikraError::RecordNotFound {
            record_id: id.to_string(),
        })
    }

    pub fn insert_translation_request(&mut self, request: TranslationRequest) {
        self.translation_requests.insert(request.id.clone(), request);
    }

    pub fn translation_requests(&self) -> impl Iterator<Item = &TranslationRequest> {
        self.translation_requests.values()
    }

    pub fn get_translation_request_mut(&mut self, id: &str) -> Result<&mut TranslationRequest> {
        self.translation_requests
            .get_mut(id)
            .ok_or_else(|| MikraError::RecordNotFound {
                record_id: id.to_string(),
            })
    }

    pub fn insert_history(&mut self, record: HistoryRecord) {
        self.history.insert(record.id.clone(), record);
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.history.values()
    }

    pub fn get_history_mut(&mut self, id: &str) -> Result<&mut HistoryRecord> {
        self.history.get_mut(id).ok_or_else(|| MikraError::RecordNotFound {
            record_id: id.to_string(),
        })
    }

    /// Attach an outline node to a book title
    pub fn add_outline_node(&mut self, title: &str, node: OutlineNode) {
        self.outlines.entry(title.to_string()).or_default().push(node);
    }

    /// All outline nodes, grouped per book title in title order
    pub fn outlines(&self) -> impl Iterator<Item = (&String, &Vec<OutlineNode>)> {
        self.outlines.iter()
    }

    pub fn outline_nodes_mut(&mut self, title: &str) -> Option<&mut Vec<OutlineNode>> {
        self.outlines.get_mut(title)
    }

    pub fn insert_sheet(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.id.clone(), sheet);
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    pub fn get_sheet_mut(&mut self, id: &str) -> Result<&mut Sheet> {
        self.sheets.get_mut(id).ok_or_else(|| MikraError::RecordNotFound {
            record_id: id.to_string(),
        })
    }
}
