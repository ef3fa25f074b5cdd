use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numbering convention for a book's top-level sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Numbering {
    /// Plain hierarchical numbering (chapter 1, 2, 3, ...)
    Positional,
    /// Folio-and-side numbering: each physical leaf has two logical sides,
    /// linearized so side b of folio N is section 2N
    Folio,
}

/// Structural definition of one book in the library
///
/// The Index declares how a book is addressed: its category chain, the
/// labels of its section levels (which fix the structural depth), the
/// numbering convention of its top level, and, for a commentary layer,
/// the base book it annotates. Content itself lives in `Version` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Canonical title, unique across the library
    pub title: String,

    /// Alternate titles and shorthands that resolve to this book
    pub aliases: Vec<String>,

    /// Ordered category chain (broadest first)
    pub categories: Vec<String>,

    /// Ordered labels of the section levels; length defines depth
    pub section_names: Vec<String>,

    /// Declared top-level length (e.g. number of folios), when known
    pub declared_length: Option<u32>,

    /// Numbering convention of the top level
    pub scheme: Numbering,

    /// Title of the base book, set only for commentary layers
    pub base_title: Option<String>,
}

impl Index {
    /// Create a plain (non-commentary) index
    pub fn new(
        title: impl Into<String>,
        categories: Vec<String>,
        section_names: Vec<String>,
        scheme: Numbering,
    ) -> Self {
        Self {
            title: title.into(),
            aliases: Vec::new(),
            categories,
            section_names,
            declared_length: None,
            scheme,
            base_title: None,
        }
    }

    /// Create a commentary index layered on a base book
    ///
    /// The commentary inherits the base book's addressing (scheme, declared
    /// length, section labels) and gains one trailing comment level, so its
    /// depth is the base depth plus one.
    pub fn commentary(title: impl Into<String>, base: &Index) -> Self {
        let mut section_names = base.section_names.clone();
        section_names.push("Comment".to_string());

        let mut categories = base.categories.clone();
        categories.push("Commentary".to_string());

        Self {
            title: title.into(),
            aliases: Vec::new(),
            categories,
            section_names,
            declared_length: base.declared_length,
            scheme: base.scheme,
            base_title: Some(base.title.clone()),
        }
    }

    /// Add an alias that resolves to this book
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the declared top-level length
    pub fn with_declared_length(mut self, length: u32) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Structural depth of the book's addressing
    pub fn depth(&self) -> usize {
        self.section_names.len()
    }

    /// Whether this book is itself a commentary layer
    pub fn is_commentary(&self) -> bool {
        self.base_title.is_some()
    }
}

/// Cached table-of-contents entry for one book
///
/// Regenerated by the state refresher after a structural edit; counts are
/// merged maxima across all editions of the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    pub categories: Vec<String>,
    /// Segment count per top-level section, merged across editions
    pub section_counts: Vec<u32>,
    /// Total addressable segments, merged across editions
    pub segment_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl TocEntry {
    pub fn new(
        title: impl Into<String>,
        categories: Vec<String>,
        section_counts: Vec<u32>,
        segment_count: u32,
    ) -> Self {
        Self {
            title: title.into(),
            categories,
            section_counts,
            segment_count,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis() -> Index {
        Index::new(
            "Genesis",
            vec!["Tanakh".to_string()],
            vec!["Chapter".to_string(), "Verse".to_string()],
            Numbering::Positional,
        )
        .with_alias("Bereshit")
    }

    #[test]
    fn test_depth_follows_section_names() {
        let index = genesis();
        assert_eq!(index.depth(), 2);
        assert!(!index.is_commentary());
    }

    #[test]
    fn test_commentary_inherits_base_addressing() {
        let base = Index::new(
            "Shabbat",
            vec!["Talmud".to_string()],
            vec!["Daf".to_string(), "Line".to_string()],
            Numbering::Folio,
        )
        .with_declared_length(157);

        let rashi = Index::commentary("Rashi on Shabbat", &base);

        assert_eq!(rashi.depth(), 3);
        assert!(rashi.is_commentary());
        assert_eq!(rashi.base_title.as_deref(), Some("Shabbat"));
        assert_eq!(rashi.scheme, Numbering::Folio);
        assert_eq!(rashi.declared_length, Some(157));
        assert_eq!(rashi.section_names.last().map(String::as_str), Some("Comment"));
    }

    #[test]
    fn test_alias_registration() {
        let index = genesis();
        assert_eq!(index.aliases, vec!["Bereshit".to_string()]);
    }
}
