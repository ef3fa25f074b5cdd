//! State refresher and search trigger interface
//!
//! After a structural edit, cached structural metadata (segment counts,
//! table-of-contents entries) is stale and affected units must be
//! re-indexed. The refresher recomputes from current content; the search
//! engine is reached only through the [`SearchIndexer`] seam.

use mikra_core::errors::Result;
use mikra_core::model::TocEntry;
use mikra_core::ops::{content_ops, Library};
use mikra_core::RefCache;

/// Re-index / delete trigger points of the external search engine
pub trait SearchIndexer {
    fn reindex(&mut self, citation: &str, edition_title: &str, language: &str);
    fn delete_unit(&mut self, citation: &str, edition_title: &str, language: &str);
}

/// Indexer that drops every trigger; for hosts without a search engine
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndexer;

impl SearchIndexer for NoopIndexer {
    fn reindex(&mut self, _citation: &str, _edition_title: &str, _language: &str) {}
    fn delete_unit(&mut self, _citation: &str, _edition_title: &str, _language: &str) {}
}

/// One captured trigger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerCall {
    Reindex {
        citation: String,
        edition_title: String,
        language: String,
    },
    DeleteUnit {
        citation: String,
        edition_title: String,
        language: String,
    },
}

/// Indexer that records every trigger call, for assertions in tests
#[derive(Debug, Clone, Default)]
pub struct RecordingIndexer {
    pub calls: Vec<IndexerCall>,
}

impl RecordingIndexer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchIndexer for RecordingIndexer {
    fn reindex(&mut self, citation: &str, edition_title: &str, language: &str) {
        self.calls.push(IndexerCall::Reindex {
            citation: citation.to_string(),
            edition_title: edition_title.to_string(),
            language: language.to_string(),
        });
    }

    fn delete_unit(&mut self, citation: &str, edition_title: &str, language: &str) {
        self.calls.push(IndexerCall::DeleteUnit {
            citation: citation.to_string(),
            edition_title: edition_title.to_string(),
            language: language.to_string(),
        });
    }
}

/// Recompute a book's cached structural state from current content
///
/// Regenerates the table-of-contents entry (unit counts merged as maxima
/// across editions) and invalidates the parse cache for the title.
///
/// # Errors
///
/// Returns `IndexNotFound` if the title has no registered index.
pub fn refresh(lib: &mut Library, cache: &mut RefCache, title: &str) -> Result<TocEntry> {
    let index = lib.get_index(title)?.clone();

    let top_len = content_ops::merged_section_len(lib, title, &[]);
    let mut section_counts = Vec::with_capacity(top_len as usize);
    let mut segment_count = 0u32;

    if index.depth() <= 1 {
        segment_count = top_len;
    } else {
        for section in 1..=top_len {
            let len = content_ops::merged_section_len(lib, title, &[section]);
            section_counts.push(len);
            segment_count += len;
        }
    }

    let entry = TocEntry::new(title, index.categories.clone(), section_counts, segment_count);
    lib.set_toc_entry(entry.clone());
    cache.invalidate(title);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mikra_core::citation::reference::Ref;
    use mikra_core::model::{Content, Index, Numbering, Version};
    use mikra_core::ops::content_ops::set_segment;

    fn genesis_ref(sections: Vec<u32>) -> Ref {
        Ref {
            book: "Genesis".to_string(),
            categories: vec!["Tanakh".to_string()],
            to_sections: sections.clone(),
            sections,
            depth: 2,
            scheme: Numbering::Positional,
            base_title: None,
        }
    }

    fn library_with_versions() -> Library {
        let mut lib = Library::new();
        lib.add_index(Index::new(
            "Genesis",
            vec!["Tanakh".to_string()],
            vec!["Chapter".to_string(), "Verse".to_string()],
            Numbering::Positional,
        ))
        .unwrap();

        let mut long = Version::new("Genesis", "he", "Long", Content::empty_node());
        for verse in 1..=4 {
            set_segment(&mut long, &genesis_ref(vec![1, verse]), "x").unwrap();
        }
        set_segment(&mut long, &genesis_ref(vec![2, 1]), "x").unwrap();

        let mut short = Version::new("Genesis", "en", "Short", Content::empty_node());
        for verse in 1..=2 {
            set_segment(&mut short, &genesis_ref(vec![2, verse]), "y").unwrap();
        }

        lib.add_version(long).unwrap();
        lib.add_version(short).unwrap();
        lib
    }

    #[test]
    fn test_refresh_merges_counts_across_editions() {
        let mut lib = library_with_versions();
        let mut cache = RefCache::new();

        let entry = refresh(&mut lib, &mut cache, "Genesis").unwrap();

        assert_eq!(entry.section_counts, vec![4, 2]);
        assert_eq!(entry.segment_count, 6);
        assert_eq!(lib.toc_entry("Genesis").unwrap().segment_count, 6);
    }

    #[test]
    fn test_refresh_invalidates_cache() {
        let mut lib = library_with_versions();
        let mut cache = RefCache::new();
        cache.parse(&lib, "Genesis 1:2").unwrap();
        assert_eq!(cache.len(), 1);

        refresh(&mut lib, &mut cache, "Genesis").unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_refresh_unknown_title() {
        let mut lib = Library::new();
        let mut cache = RefCache::new();
        assert!(refresh(&mut lib, &mut cache, "Atlantis").is_err());
    }

    #[test]
    fn test_recording_indexer_captures_calls() {
        let mut indexer = RecordingIndexer::new();
        indexer.reindex("Genesis 1", "Long", "he");
        indexer.delete_unit("Genesis 1:4", "Long", "he");

        assert_eq!(
            indexer.calls,
            vec![
                IndexerCall::Reindex {
                    citation: "Genesis 1".to_string(),
                    edition_title: "Long".to_string(),
                    language: "he".to_string(),
                },
                IndexerCall::DeleteUnit {
                    citation: "Genesis 1:4".to_string(),
                    edition_title: "Long".to_string(),
                    language: "he".to_string(),
                },
            ]
        );
    }
}
