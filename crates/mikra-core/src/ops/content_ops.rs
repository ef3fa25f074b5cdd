//! Address-driven content access
//!
//! Reads and writes on the nested content of one edition, plus the
//! merged (max across editions) structural lengths that stand in for a
//! book's structural state when editions are jagged.

use crate::citation::reference::Ref;
use crate::errors::{MikraError, Result};
use crate::model::{Content, Version};
use crate::ops::Library;

/// Read the segment a segment-level address points at
///
/// # Errors
///
/// Returns `PathUnaddressable` if the address does not reach into this
/// edition's content.
pub fn segment_at<'a>(version: &'a Version, r: &Ref) -> Result<&'a Content> {
    version
        .content
        .get(&r.sections)
        .ok_or_else(|| MikraError::PathUnaddressable {
            title: version.title.clone(),
            path: r.normalize(),
        })
}

/// Write a segment's text, growing the content tree as needed
///
/// Intermediate levels grow with empty nodes and the target level with
/// empty leaves, so sparse editions can be extended out of order.
///
/// # Errors
///
/// Returns `PathUnaddressable` if a non-empty leaf blocks the path at an
/// intermediate level.
pub fn set_segment(version: &mut Version, r: &Ref, text: impl Into<String>) -> Result<()> {
    let (path, innermost) = match r.sections.split_last() {
        Some((last, path)) => (path, *last),
        None => {
            return Err(MikraError::PathUnaddressable {
                title: version.title.clone(),
                path: r.normalize(),
            })
        }
    };

    let title = version.title.clone();
    let rendered = r.normalize();
    let children = grow_to_node(&mut version.content, path, &title, &rendered)?;

    let idx = (innermost - 1) as usize;
    while children.len() <= idx {
        children.push(Content::empty_leaf());
    }
    children[idx] = Content::leaf(text);
    Ok(())
}

/// Direct children of the node at a section path, if present
pub fn section_children<'a>(content: &'a Content, path: &[u32]) -> Option<&'a Vec<Content>> {
    content.get(path)?.children()
}

/// Mutable children of the node at a section path, if present
pub fn section_children_mut<'a>(
    content: &'a mut Content,
    path: &[u32],
) -> Option<&'a mut Vec<Content>> {
    content.get_mut(path)?.children_mut()
}

/// Number of units under a section path in one edition (0 if absent)
pub fn section_len(version: &Version, path: &[u32]) -> usize {
    section_children(&version.content, path).map_or(0, Vec::len)
}

/// Merged length of a section across all editions of a book
///
/// The maximum unit count at the path over every edition; this is the
/// structural length used when editions disagree.
pub fn merged_section_len(lib: &Library, title: &str, path: &[u32]) -> u32 {
    lib.versions_of(title)
        .iter()
        .map(|v| section_len(v, path) as u32)
        .max()
        .unwrap_or(0)
}

// Walk to the node at `path`, converting empty leaves to nodes and
// growing missing intermediate slots with empty nodes.
fn grow_to_node<'a>(
    content: &'a mut Content,
    path: &[u32],
    title: &str,
    rendered: &str,
) -> Result<&'a mut Vec<Content>> {
    let mut current = content;
    for &section in path {
        if matches!(current, Content::Leaf(text) if text.is_empty()) {
            *current = Content::empty_node();
        }
        let children = current
            .children_mut()
            .ok_or_else(|| MikraError::PathUnaddressable {
                title: title.to_string(),
                path: rendered.to_string(),
            })?;
        let idx = (section - 1) as usize;
        while children.len() <= idx {
            children.push(Content::empty_node());
        }
        current = &mut children[idx];
    }

    if matches!(current, Content::Leaf(text) if text.is_empty()) {
        *current = Content::empty_node();
    }
    current
        .children_mut()
        .ok_or_else(|| MikraError::PathUnaddressable {
            title: title.to_string(),
            path: rendered.to_string(),
        })
}
