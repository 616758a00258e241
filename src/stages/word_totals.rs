//! Word totals
//!
//! Collapses the word extractor's per-record counts into one count per word, the
//! `word\tcount` dataset the frequency ranker reads.

use std::path::Path;

use log::warn;

use crate::config::PipelineConfig;
use crate::engine::{InputSplit, JobReport, MapReduceJob, Mapper, TaskContext};
use crate::error::Result;
use crate::models::WordKey;
use crate::stages::sum::SumReducer;

/// Job name used in logs and reports
pub const JOB_NAME: &str = "Total Word Counts across the NEISS Descriptions";

pub const MALFORMED_RECORDS: &str = "MALFORMED_RECORDS";

/// Drops the record from `word\tcase@partition\tcount`, keeping `word -> count`
pub struct WordTotalMapper;

impl Mapper for WordTotalMapper {
    type Key = String;
    type Value = u64;

    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<String, u64>) {
        match WordKey::parse_counted_line(line) {
            Some((key, count)) => ctx.write(key.word, count),
            None => {
                ctx.increment(MALFORMED_RECORDS, 1);
                warn!("Skipping unreadable word count in {}: \"{line}\"", split.name);
            }
        }
    }
}

/// Run the word totals job over word extractor output
pub fn run(input_dir: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<JobReport> {
    let reducer = SumReducer::<String>::new();
    MapReduceJob::new(JOB_NAME, &WordTotalMapper, &reducer)
        .with_combiner(&reducer)
        .with_reduce_tasks(config.reduce_tasks)
        .run(input_dir, output_dir, config)
}
