//! Broadcast reference data
//!
//! Loaded once per job before any task starts, then shared read-only (behind `Arc`) by
//! every map task.

pub mod codes;
pub mod stop_words;

pub use codes::{CodeTable, CodeTables, Dimension};
pub use stop_words::{STOP_WORDS_FILE, StopWords};
