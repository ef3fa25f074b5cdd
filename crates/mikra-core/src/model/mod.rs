pub mod content;
pub mod index;
pub mod records;
pub mod version;

pub use content::Content;
pub use index::{Index, Numbering, TocEntry};
pub use records::{
    HistoryRecord, Link, Note, OutlineNode, RefState, Sheet, SheetNode, TranslationRequest,
};
pub use version::Version;
