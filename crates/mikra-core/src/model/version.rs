use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::Content;

/// One language/edition of one book
///
/// Holds the nested content whose depth equals the book's structural
/// depth. Editions of the same book are deliberately jagged: each may
/// cover a different portion of the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Title of the book this edition belongs to
    pub title: String,

    /// Language code of the edition
    pub language: String,

    /// Display title of the edition
    pub edition_title: String,

    /// Nested content tree
    pub content: Content,

    /// Timestamp when this version was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this version was last updated
    pub updated_at: DateTime<Utc>,
}

impl Version {
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        edition_title: impl Into<String>,
        content: Content,
    ) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            language: language.into(),
            edition_title: edition_title.into(),
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
