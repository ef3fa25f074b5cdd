//! Citation addressing: grammar, parser, and numbering schemes.

pub mod folio;
pub mod parser;
pub mod reference;

pub use folio::Side;
pub use parser::{normalize_input, parse, parse_with, ParseOpts};
pub use reference::Ref;
