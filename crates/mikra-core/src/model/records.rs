//! Dependent, address-bearing records
//!
//! These records embed citation strings and are rewritten as a side effect
//! of a structural edit. They are created by ordinary user actions; the
//! splice engine only ever mutates their embedded addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An unordered pair of citations plus a relation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// The two linked citations
    pub refs: [String; 2],

    /// Relation type (e.g. "commentary", "reference", "targum")
    pub link_type: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        link_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            refs: [first.into(), second.into()],
            link_type: link_type.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user note anchored to one citation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub citation: String,
    pub text: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(
        citation: impl Into<String>,
        text: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            citation: citation.into(),
            text: text.into(),
            owner: owner.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A request for a translation of one citation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub id: String,
    pub citation: String,
    pub requester: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslationRequest {
    pub fn new(citation: impl Into<String>, requester: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            citation: citation.into(),
            requester: requester.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Citation slots inside a revision-history sub-object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefState {
    pub citation: Option<String>,
    pub citations: Option<Vec<String>>,
}

/// One revision-history record
///
/// Carries citations in up to five locations: a top-level citation plus
/// single and list slots inside the "previous state" and "new state"
/// sub-objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub activity: String,
    pub citation: Option<String>,
    pub new: Option<RefState>,
    pub old: Option<RefState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(activity: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            activity: activity.into(),
            citation: None,
            new: None,
            old: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    pub fn with_new(mut self, state: RefState) -> Self {
        self.new = Some(state);
        self
    }

    pub fn with_old(mut self, state: RefState) -> Self {
        self.old = Some(state);
        self
    }
}

/// Outline / alt-structure leaf
///
/// Labels an arbitrary named range independent of the book's native
/// numbering, either as one whole-range citation or as an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub title: String,
    pub whole_citation: Option<String>,
    pub citations: Vec<String>,
}

impl OutlineNode {
    pub fn whole(title: impl Into<String>, citation: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            whole_citation: Some(citation.into()),
            citations: Vec::new(),
        }
    }

    pub fn listed(title: impl Into<String>, citations: Vec<String>) -> Self {
        Self {
            title: title.into(),
            whole_citation: None,
            citations,
        }
    }
}

/// One node of a sheet's source tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetNode {
    pub citation: Option<String>,
    pub comment: Option<String>,
    pub children: Vec<SheetNode>,
}

impl SheetNode {
    pub fn cited(citation: impl Into<String>) -> Self {
        Self {
            citation: Some(citation.into()),
            comment: None,
            children: Vec::new(),
        }
    }

    pub fn comment_only(comment: impl Into<String>) -> Self {
        Self {
            citation: None,
            comment: Some(comment.into()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SheetNode>) -> Self {
        self.children = children;
        self
    }
}

/// A user-assembled source sheet: a tree of optionally-cited nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub title: String,
    pub sources: Vec<SheetNode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sheet {
    pub fn new(title: impl Into<String>, sources: Vec<SheetNode>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            sources,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_holds_two_slots() {
        let link = Link::new("Genesis 1:1", "Rashi on Genesis 1:1:1", "commentary");
        assert_eq!(link.refs[0], "Genesis 1:1");
        assert_eq!(link.refs[1], "Rashi on Genesis 1:1:1");
        assert!(!link.id.is_empty());
    }

    #[test]
    fn test_history_builder_fills_sub_objects() {
        let record = HistoryRecord::new("edit text")
            .with_citation("Shabbat 45b:12")
            .with_new(RefState {
                citation: Some("Shabbat 45b:12".to_string()),
                citations: None,
            })
            .with_old(RefState {
                citation: None,
                citations: Some(vec!["Shabbat 45b:12".to_string()]),
            });

        assert_eq!(record.citation.as_deref(), Some("Shabbat 45b:12"));
        assert!(record.new.as_ref().unwrap().citation.is_some());
        assert_eq!(record.old.as_ref().unwrap().citations.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_sheet_tree_nesting() {
        let sheet = Sheet::new(
            "Reading",
            vec![SheetNode::cited("Genesis 1:1")
                .with_children(vec![SheetNode::comment_only("a remark")])],
        );
        assert_eq!(sheet.sources.len(), 1);
        assert_eq!(sheet.sources[0].children.len(), 1);
        assert!(sheet.sources[0].children[0].citation.is_none());
    }
}
