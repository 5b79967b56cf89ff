//! Data model for wiki structures and generated page content.
//!
//! `StructuredDocument` is what the parser recovers from an AI response;
//! `PageContents` is what the external content generator hands back, keyed
//! by page id. Both are transient and immutable once built.

mod content;
mod document;

pub use content::{load_page_contents, PageContent, PageContents};
pub use document::{PageRecord, StructuredDocument, DEFAULT_IMPORTANCE};
