use std::collections::HashMap;

use mikra_core::citation::reference::Ref;
use mikra_core::errors::{MikraError, Result};
use mikra_core::ops::{content_ops, Library};
use mikra_core::RefCache;

use super::SpliceMode;

/// Immutable, fully-resolved state for one splice invocation
///
/// Built once before any mutation; every decision function receives this
/// value instead of reaching into shared state. Construction performs all
/// anchor precondition checks, so holding a context means the invocation
/// is structurally valid.
#[derive(Debug, Clone)]
pub struct SpliceContext {
    /// The validated anchor: exact, non-range, non-commentary, innermost
    pub anchor: Ref,
    pub mode: SpliceMode,
    /// Base book title
    pub book: String,
    /// Structural depth of the base book
    pub depth: usize,
    /// Section levels above the anchor segment
    pub section_path: Vec<u32>,
    /// 1-based position of the anchor segment within its section
    pub position: u32,
    /// Commentary layers anchored to the base book, sorted by title
    pub commentary_titles: Vec<String>,
    /// Per commentary title: merged length of the anchor segment's
    /// comment sub-array, fixed before any mutation so comment indexes
    /// land at deterministic offsets after a join
    pub comment_section_lengths: HashMap<String, u32>,
    /// Per affected title: merged pre-splice length of the anchor section
    pub section_lengths: HashMap<String, u32>,
}

impl SpliceContext {
    /// Resolve and validate an anchor citation for the given mode
    ///
    /// # Errors
    ///
    /// * `AnchorIsRange` - anchor is a range address
    /// * `AnchorIsCommentary` - anchor addresses a commentary layer
    /// * `AnchorNotSegmentLevel` - anchor is not an innermost-level address
    /// * `PathUnaddressable` - anchor is past the content of every edition
    /// * `NoFollowingSegment` - join anchor is the last segment of its
    ///   section in every edition
    pub fn resolve(
        lib: &Library,
        cache: &mut RefCache,
        anchor: &str,
        mode: SpliceMode,
    ) -> Result<Self> {
        let r = cache.parse(lib, anchor)?;

        if r.is_range() {
            return Err(MikraError::AnchorIsRange {
                citation: r.normalize(),
            });
        }
        if r.is_commentary() {
            return Err(MikraError::AnchorIsCommentary {
                citation: r.normalize(),
            });
        }
        if !r.is_segment_level() || r.depth == 0 {
            return Err(MikraError::AnchorNotSegmentLevel {
                citation: r.normalize(),
            });
        }
        let position = r.innermost().ok_or_else(|| MikraError::AnchorNotSegmentLevel {
            citation: r.normalize(),
        })?;

        let book = r.book.clone();
        let section_path = r.section_path().to_vec();

        let base_len = content_ops::merged_section_len(lib, &book, &section_path);
        if position > base_len {
            return Err(MikraError::PathUnaddressable {
                title: book,
                path: r.normalize(),
            });
        }
        if mode == SpliceMode::Join && base_len < position + 1 {
            return Err(MikraError::NoFollowingSegment {
                citation: r.normalize(),
            });
        }

        let commentary_titles = lib.commentaries_on(&book);

        let mut section_lengths = HashMap::new();
        section_lengths.insert(book.clone(), base_len);

        let mut comment_path = section_path.clone();
        comment_path.push(position);
        let mut comment_section_lengths = HashMap::new();
        for title in &commentary_titles {
            comment_section_lengths.insert(
                title.clone(),
                content_ops::merged_section_len(lib, title, &comment_path),
            );
            section_lengths.insert(
                title.clone(),
                content_ops::merged_section_len(lib, title, &section_path),
            );
        }

        Ok(Self {
            depth: r.depth,
            anchor: r,
            mode,
            book,
            section_path,
            position,
            commentary_titles,
            comment_section_lengths,
            section_lengths,
        })
    }

    /// Every title the splice touches: the base book, then its
    /// commentary layers in sorted order
    pub fn affected_titles(&self) -> Vec<String> {
        let mut titles = Vec::with_capacity(1 + self.commentary_titles.len());
        titles.push(self.book.clone());
        titles.extend(self.commentary_titles.iter().cloned());
        titles
    }

    /// Render a citation for a title at the given sections
    pub fn citation_for(&self, lib: &Library, title: &str, sections: &[u32]) -> Result<String> {
        let index = lib.get_index(title)?;
        let r = Ref {
            book: title.to_string(),
            categories: index.categories.clone(),
            sections: sections.to_vec(),
            to_sections: sections.to_vec(),
            depth: index.depth(),
            scheme: index.scheme,
            base_title: index.base_title.clone(),
        };
        Ok(r.normalize())
    }
}
