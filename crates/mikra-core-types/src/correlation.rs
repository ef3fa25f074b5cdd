//! Correlation types for operation tracking
//!
//! A structural edit fans out into many per-edition mutations and
//! per-record rewrites. These types let every log line produced by one
//! invocation share a single request id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single engine invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one engine invocation for correlation
///
/// The `book` field names the text the invocation is anchored to, when
/// known up front, so log lines can be filtered per title.
#[derive(Debug, Clone)]
pub struct OpContext {
    pub request_id: RequestId,
    pub book: Option<String>,
}

impl OpContext {
    /// Create a new context with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            book: None,
        }
    }

    /// Create a context anchored to a book title
    pub fn for_book(title: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            book: Some(title.into()),
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            book: None,
        }
    }
}

impl Default for OpContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        // Should generate different IDs
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
        assert!(!id2.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        let display_str = format!("{}", id);
        assert_eq!(display_str, id.as_str());
    }

    #[test]
    fn test_op_context_for_book() {
        let ctx = OpContext::for_book("Genesis");
        assert!(!ctx.request_id.as_str().is_empty());
        assert_eq!(ctx.book.as_deref(), Some("Genesis"));
    }

    #[test]
    fn test_op_context_default_has_no_book() {
        let ctx = OpContext::new();
        assert!(ctx.book.is_none());
    }

    #[test]
    fn test_request_id_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
