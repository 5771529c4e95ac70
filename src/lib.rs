//! Find, classify and audit every hyperlink-like reference in a `.docx`
//! document: relationship hyperlinks, literal URLs, `HYPERLINK` field codes,
//! bookmarks and tab-separated internal cross-references.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod context;
pub mod detectors;
pub mod document;
pub mod error;
pub mod extract;
pub mod fields;
pub mod loader;
pub mod markup;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod types;

pub use extract::{extract, extract_hyperlinks};
