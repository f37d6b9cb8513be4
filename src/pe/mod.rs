//! Portable Executable structure parsing.
//!
//! Interprets a byte buffer as a Windows PE image and exposes the layout
//! needed by the executable feature builder. Nothing in the buffer is ever
//! executed, and every read is bounds-checked so adversarial or truncated
//! images degrade to partial summaries instead of failures.

pub mod parser;
pub mod types;

pub use parser::parse;
pub use types::{ImportedDll, PeError, PeHeaders, PeSummary, ResourceBlob, SectionInfo};
