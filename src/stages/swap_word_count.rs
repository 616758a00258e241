//! Frequency ranker
//!
//! Inverts `(word, count)` pairs to `(count, word)` and sorts them by count in a single
//! partition.

use std::path::Path;

use log::{info, warn};

use crate::config::PipelineConfig;
use crate::engine::{
    DescendingOrder, InputSplit, JobReport, MapReduceJob, Mapper, NaturalOrder, Reducer,
    SinglePartitioner, TaskContext,
};
use crate::error::Result;
use crate::models::keys::FIELD_DELIMITER;

/// Job name used in logs and reports
pub const JOB_NAME: &str = "Swap WordCount against the NEISS Descriptions";

pub const MALFORMED_RECORDS: &str = "MALFORMED_RECORDS";

/// Options of the frequency ranker
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapOptions {
    /// Highest counts first instead of lowest
    pub descending: bool,
}

impl SwapOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }
}

/// Parse a `word\tcount` line
#[must_use]
pub fn parse_word_count_line(line: &str) -> Option<(&str, i64)> {
    let (word, count) = line.split_once(FIELD_DELIMITER)?;
    let count = count.trim().parse::<i64>().ok()?;
    Some((word, count))
}

/// Swaps `word\tcount` to `count -> word`
pub struct SwapMapper;

impl Mapper for SwapMapper {
    type Key = i64;
    type Value = String;

    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<i64, String>) {
        match parse_word_count_line(line) {
            Some((word, count)) => ctx.write(count, word.to_string()),
            None => {
                ctx.increment(MALFORMED_RECORDS, 1);
                warn!("Skipping unreadable word count in {}: \"{line}\"", split.name);
            }
        }
    }
}

/// Writes every word of a count unchanged
pub struct SwapReducer;

impl Reducer for SwapReducer {
    type InKey = i64;
    type InValue = String;
    type OutKey = i64;
    type OutValue = String;

    fn reduce(&self, key: &i64, values: Vec<String>, ctx: &mut TaskContext<i64, String>) {
        for word in values {
            ctx.write(*key, word);
        }
    }
}

/// Run the ranker; all output lands in a single part file
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    options: &SwapOptions,
) -> Result<JobReport> {
    let job = MapReduceJob::new(JOB_NAME, &SwapMapper, &SwapReducer)
        .with_partitioner(SinglePartitioner)
        .with_reduce_tasks(1);

    if options.descending {
        info!("Enabled descending ordering over the word counts");
        job.with_order(DescendingOrder).run(input_dir, output_dir, config)
    } else {
        job.with_order(NaturalOrder).run(input_dir, output_dir, config)
    }
}
