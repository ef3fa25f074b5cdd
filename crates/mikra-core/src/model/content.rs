use serde::{Deserialize, Serialize};

/// Nested text content of one edition
///
/// Content is a recursive sum type: a `Leaf` holds one segment's text and
/// a `Node` holds an ordered, possibly jagged sequence of sub-units. The
/// nesting depth of a version's content equals its book's structural
/// depth. Serialization is untagged, so a leaf serializes as a JSON
/// string and a node as a JSON array, matching the classic jagged-array
/// payloads of text APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Leaf(String),
    Node(Vec<Content>),
}

impl Content {
    /// Create a leaf segment
    pub fn leaf(text: impl Into<String>) -> Self {
        Content::Leaf(text.into())
    }

    /// Create a node from children
    pub fn node(children: Vec<Content>) -> Self {
        Content::Node(children)
    }

    /// Create an empty leaf placeholder
    pub fn empty_leaf() -> Self {
        Content::Leaf(String::new())
    }

    /// Create an empty node
    pub fn empty_node() -> Self {
        Content::Node(Vec::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Content::Leaf(_))
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Content::Node(_))
    }

    /// Semantic emptiness: an empty leaf, or a node of only empty children
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Leaf(text) => text.is_empty(),
            Content::Node(children) => children.iter().all(Content::is_empty),
        }
    }

    /// Number of direct children (0 for a leaf)
    pub fn len(&self) -> usize {
        match self {
            Content::Leaf(_) => 0,
            Content::Node(children) => children.len(),
        }
    }

    /// Leaf text, if this is a leaf
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Leaf(text) => Some(text),
            Content::Node(_) => None,
        }
    }

    /// Direct children, if this is a node
    pub fn children(&self) -> Option<&Vec<Content>> {
        match self {
            Content::Leaf(_) => None,
            Content::Node(children) => Some(children),
        }
    }

    /// Mutable direct children, if this is a node
    pub fn children_mut(&mut self) -> Option<&mut Vec<Content>> {
        match self {
            Content::Leaf(_) => None,
            Content::Node(children) => Some(children),
        }
    }

    /// Consume into a child list
    ///
    /// A node yields its children; a non-empty leaf yields itself as a
    /// single-element list; an empty leaf yields an empty list. Used when
    /// a per-segment comment group must be treated as a list regardless of
    /// how sparse the stored content is.
    pub fn into_children(self) -> Vec<Content> {
        match self {
            Content::Node(children) => children,
            Content::Leaf(text) if text.is_empty() => Vec::new(),
            leaf @ Content::Leaf(_) => vec![leaf],
        }
    }

    /// Nesting depth: 0 for a leaf, 1 + deepest child for a node
    pub fn depth(&self) -> usize {
        match self {
            Content::Leaf(_) => 0,
            Content::Node(children) => {
                1 + children.iter().map(Content::depth).max().unwrap_or(0)
            }
        }
    }

    /// Navigate to the unit at a 1-based section path
    pub fn get(&self, path: &[u32]) -> Option<&Content> {
        let mut current = self;
        for &section in path {
            let idx = section.checked_sub(1)? as usize;
            current = current.children()?.get(idx)?;
        }
        Some(current)
    }

    /// Navigate mutably to the unit at a 1-based section path
    pub fn get_mut(&mut self, path: &[u32]) -> Option<&mut Content> {
        let mut current = self;
        for &section in path {
            let idx = section.checked_sub(1)? as usize;
            current = match current {
                Content::Leaf(_) => return None,
                Content::Node(children) => children.get_mut(idx)?,
            };
        }
        Some(current)
    }

    /// Count non-empty leaves in the whole tree
    pub fn count_segments(&self) -> u32 {
        match self {
            Content::Leaf(text) => u32::from(!text.is_empty()),
            Content::Node(children) => children.iter().map(Content::count_segments).sum(),
        }
    }
}
