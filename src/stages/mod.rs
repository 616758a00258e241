//! The pipeline stages
//!
//! Each stage is a job over the previous stage's output directory:
//!
//! 1. `product_filter` - raw records to enriched amusement records (map-only)
//! 2. `word_frequency` - enriched records to `(word, case@partition) -> count`
//! 3. `word_count` - per-record word counts against the record's total
//! 4. `sort_by_year` - enriched records bucketed by treatment year
//! 5. `word_totals` - word counts summed over every record
//! 6. `swap_word_count` - `(count, word)` ranking of the word totals
//!
//! `pipeline` runs them all in order.

pub mod pipeline;
pub mod product_filter;
pub mod sort_by_year;
pub mod sum;
pub mod swap_word_count;
pub mod word_count;
pub mod word_frequency;
pub mod word_totals;

pub use pipeline::{PipelineOptions, PipelineReport};
pub use sum::SumReducer;
pub use swap_word_count::SwapOptions;
pub use word_frequency::WordFrequencyOptions;
