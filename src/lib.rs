//! A local batch pipeline turning NEISS injury records into per-word frequency data
//! for a TF-IDF computation.
//!
//! Raw records are filtered to amusement-attraction incidents and enriched with code
//! descriptions, their free-text descriptions are tokenized and counted per record, and
//! the counts are totalled, ranked and bucketed by treatment year. Every stage is a
//! map/reduce job run on the in-process substrate in [`engine`].

pub mod broadcast;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod stages;
pub mod utils;

// Re-export the most common types for easier use
pub use config::PipelineConfig;
pub use engine::{Counters, JobReport};
pub use error::{PipelineError, Result};
pub use stages::{PipelineOptions, PipelineReport, SwapOptions, WordFrequencyOptions};
