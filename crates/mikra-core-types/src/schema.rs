//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Domain identifiers
pub const FIELD_BOOK: &str = "book";
pub const FIELD_ANCHOR: &str = "anchor";
pub const FIELD_CITATION: &str = "citation";
pub const FIELD_EDITION: &str = "edition";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_RECORD_KIND: &str = "record_kind";

// Error fields
pub const FIELD_ERR: &str = "err";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_CASCADE_SKIP: &str = "cascade_skip";
