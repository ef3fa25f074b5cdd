use serde::{Deserialize, Serialize};

use super::folio;
use crate::model::Numbering;

/// A parsed, structured citation into one book
///
/// `sections` and `to_sections` always have equal length; for a non-range
/// address they are equal. Section values are 1-based, with folio sides
/// already linearized at the top level of folio-numbered books. The
/// section count never exceeds the book's declared depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Canonical book title
    pub book: String,

    /// Category chain of the book
    pub categories: Vec<String>,

    /// Ordered section numbers (range start for a range address)
    pub sections: Vec<u32>,

    /// Range end section numbers; equals `sections` for a non-range
    pub to_sections: Vec<u32>,

    /// Declared structural depth of the book
    pub depth: usize,

    /// Numbering convention of the book's top level
    pub scheme: Numbering,

    /// For a commentary address, the title of the base book
    pub base_title: Option<String>,
}

impl Ref {
    /// Whether start and end of the address differ
    pub fn is_range(&self) -> bool {
        self.sections != self.to_sections
    }

    /// Whether this addresses a commentary layer
    pub fn is_commentary(&self) -> bool {
        self.base_title.is_some()
    }

    /// Whether this addresses the whole book
    pub fn is_whole_book(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether this is an exact address at the innermost level
    pub fn is_segment_level(&self) -> bool {
        !self.is_range() && self.sections.len() == self.depth
    }

    /// Whether this addresses one level above the innermost
    pub fn is_section_level(&self) -> bool {
        self.sections.len() + 1 == self.depth
    }

    /// All section levels above the innermost
    pub fn section_path(&self) -> &[u32] {
        match self.sections.len() {
            0 => &[],
            n => &self.sections[..n - 1],
        }
    }

    /// The innermost section number, if any levels are present
    pub fn innermost(&self) -> Option<u32> {
        self.sections.last().copied()
    }

    /// The same address with a different innermost section number
    pub fn with_innermost(&self, value: u32) -> Ref {
        let mut out = self.clone();
        if let Some(last) = out.sections.last_mut() {
            *last = value;
        }
        if let Some(last) = out.to_sections.last_mut() {
            *last = value;
        }
        out
    }

    /// The preceding segment in the same section, if one exists
    pub fn previous_segment(&self) -> Option<Ref> {
        let innermost = self.innermost()?;
        if self.is_range() || innermost <= 1 {
            return None;
        }
        Some(self.with_innermost(innermost - 1))
    }

    /// The following segment in the same section
    pub fn next_segment(&self) -> Option<Ref> {
        let innermost = self.innermost()?;
        if self.is_range() {
            return None;
        }
        Some(self.with_innermost(innermost + 1))
    }

    /// True iff `other`'s section range is a subset of this address's
    pub fn contains(&self, other: &Ref) -> bool {
        self.book == other.book
            && self.start_key() <= other.start_key()
            && other.end_key() <= self.end_key()
    }

    /// True iff this address ends strictly before `other` starts
    pub fn precedes(&self, other: &Ref) -> bool {
        self.book == other.book && self.end_key() < other.start_key()
    }

    /// Canonical round-trippable rendering
    ///
    /// Ranges render only the differing trailing levels after the first
    /// point of divergence (`Book 4:5-6` rather than `Book 4:5-4:6`).
    pub fn normalize(&self) -> String {
        if self.sections.is_empty() {
            return self.book.clone();
        }

        let mut out = format!("{} {}", self.book, self.render_levels(&self.sections, 0));
        if self.is_range() {
            let divergence = self
                .sections
                .iter()
                .zip(self.to_sections.iter())
                .position(|(a, b)| a != b)
                .unwrap_or(0);
            out.push('-');
            out.push_str(&self.render_levels(&self.to_sections[divergence..], divergence));
        }
        out
    }

    fn render_levels(&self, values: &[u32], start_level: usize) -> String {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.render_level(start_level + i, v))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn render_level(&self, level: usize, value: u32) -> String {
        if level == 0 && self.scheme == Numbering::Folio {
            folio::folio_token(value)
        } else {
            value.to_string()
        }
    }

    // Start of the addressed range, padded to full depth. Unspecified
    // trailing levels start at their first sub-unit.
    fn start_key(&self) -> Vec<u32> {
        let mut key = self.sections.clone();
        key.resize(self.depth, 1);
        key
    }

    // End of the addressed range, padded to full depth. Unspecified
    // trailing levels extend to the end of the unit.
    fn end_key(&self) -> Vec<u32> {
        let mut key = self.to_sections.clone();
        key.resize(self.depth, u32::MAX);
        key
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalize())
    }
}
