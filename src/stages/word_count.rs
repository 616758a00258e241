//! Per-record totalizer
//!
//! Regroups the word extractor's output by record so each word's count can be set
//! against the total number of words in its record.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;

use crate::config::PipelineConfig;
use crate::engine::{InputSplit, JobReport, MapReduceJob, Mapper, Reducer, TaskContext};
use crate::error::Result;
use crate::models::keys::EQUALS_DELIMITER;
use crate::models::{RecordKey, TermFrequency, WordCount, WordKey};

/// Job name used in logs and reports
pub const JOB_NAME: &str = "Total WordCount against the Incident Descriptions";

pub const TOTAL_RECORDS_GENERATED: &str = "TOTAL_RECORDS_GENERATED";
pub const MALFORMED_RECORDS: &str = "MALFORMED_RECORDS";

/// Re-keys `word\tcase@partition\tcount` to `case@partition -> word=count`
pub struct RecordRegroupMapper;

impl Mapper for RecordRegroupMapper {
    type Key = RecordKey;
    type Value = WordCount;

    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<RecordKey, WordCount>) {
        match WordKey::parse_counted_line(line) {
            Some((key, count)) => ctx.write(key.record, WordCount::new(key.word, count)),
            None => {
                ctx.increment(MALFORMED_RECORDS, 1);
                warn!("Skipping unreadable word count in {}: \"{line}\"", split.name);
            }
        }
    }
}

/// Emits `word=case@partition -> count/total` for every word of a record
///
/// A word seen twice for the same record keeps its last count, while the total adds up
/// every count seen.
pub struct RecordTotalReducer;

impl Reducer for RecordTotalReducer {
    type InKey = RecordKey;
    type InValue = WordCount;
    type OutKey = String;
    type OutValue = TermFrequency;

    fn reduce(
        &self,
        key: &RecordKey,
        values: Vec<WordCount>,
        ctx: &mut TaskContext<String, TermFrequency>,
    ) {
        let mut total = 0;
        let mut words = BTreeMap::new();
        for value in values {
            total += value.count;
            words.insert(value.word, value.count);
        }

        for (word, count) in words {
            ctx.write(format!("{word}{EQUALS_DELIMITER}{key}"), TermFrequency { count, total });
            ctx.increment(TOTAL_RECORDS_GENERATED, 1);
        }
    }
}

/// Run the totalizer over word extractor output
pub fn run(input_dir: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<JobReport> {
    MapReduceJob::new(JOB_NAME, &RecordRegroupMapper, &RecordTotalReducer)
        .with_reduce_tasks(config.reduce_tasks)
        .run(input_dir, output_dir, config)
}
