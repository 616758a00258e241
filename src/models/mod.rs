//! Domain models for the NEISS pipeline
//!
//! Records as they appear in the raw extract and after enrichment, plus the composite
//! keys the later stages build from them.

pub mod incident;
pub mod keys;

// Re-export commonly used types
pub use incident::{
    EnrichedRecord, MalformedRecord, RawField, RawRecord, pad_case_number, parse_treatment_year,
};
pub use keys::{RecordKey, TermFrequency, WordCount, WordKey};
