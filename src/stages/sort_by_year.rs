//! Year-bucketed sorter
//!
//! Re-partitions enriched records so each reduce partition holds one treatment year,
//! ordered by case number.

use std::path::Path;

use log::warn;

use crate::config::PipelineConfig;
use crate::engine::{InputSplit, JobReport, MapReduceJob, Mapper, Partitioner, Reducer, TaskContext};
use crate::error::Result;
use crate::models::incident::{TAB_DELIMITER, parse_treatment_year};

/// Job name used in logs and reports
pub const JOB_NAME: &str = "Sort Filtered NEISS Data by Year & CaseNbr";

/// Last year covered by the data
pub const LAST_YEAR_WITH_DATA: i32 = 2013;

/// Years covered by the data (1997 through 2013), one reduce partition each
pub const TOTAL_YEARS_OF_DATA: usize = 17;

pub const BAD_DATE: &str = "BAD_DATE";

fn treatment_date(value: &str) -> &str {
    value.split(TAB_DELIMITER).next().unwrap_or_default()
}

/// Routes a record to the partition of its treatment year
#[derive(Debug, Clone, Copy)]
pub struct YearPartitioner {
    pub last_year: i32,
    pub total_years: usize,
}

impl Default for YearPartitioner {
    fn default() -> Self {
        Self {
            last_year: LAST_YEAR_WITH_DATA,
            total_years: TOTAL_YEARS_OF_DATA,
        }
    }
}

impl YearPartitioner {
    /// Partition of a year among `num_partitions`
    ///
    /// Years outside the covered range wrap around instead of going negative.
    #[must_use]
    pub fn partition_for_year(&self, year: i32, num_partitions: usize) -> usize {
        if num_partitions == 0 {
            return 0;
        }
        let offset = i64::from(year) - i64::from(self.last_year) + self.total_years as i64 - 1;
        offset.rem_euclid(num_partitions as i64) as usize
    }
}

impl Partitioner<String, String> for YearPartitioner {
    fn partition(&self, _key: &String, value: &String, num_partitions: usize) -> usize {
        parse_treatment_year(treatment_date(value))
            .map_or(0, |year| self.partition_for_year(year, num_partitions))
    }
}

/// Passes `case -> enriched fields` through, counting records without a usable year
pub struct YearSortMapper;

impl Mapper for YearSortMapper {
    type Key = String;
    type Value = String;

    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<String, String>) {
        let (case_number, value) = line.split_once(TAB_DELIMITER).unwrap_or((line, ""));
        if parse_treatment_year(treatment_date(value)).is_none() {
            ctx.increment(BAD_DATE, 1);
            warn!("No treatment year for case {case_number} in {}, using partition 0", split.name);
        }
        ctx.write(case_number.to_string(), value.to_string());
    }
}

/// Writes every value of a case number unchanged
pub struct IdentityReducer;

impl Reducer for IdentityReducer {
    type InKey = String;
    type InValue = String;
    type OutKey = String;
    type OutValue = String;

    fn reduce(&self, key: &String, values: Vec<String>, ctx: &mut TaskContext<String, String>) {
        for value in values {
            ctx.write(key.clone(), value);
        }
    }
}

/// Run the sorter over product filter output, one partition per year
pub fn run(input_dir: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<JobReport> {
    let partitioner = YearPartitioner::default();
    MapReduceJob::new(JOB_NAME, &YearSortMapper, &IdentityReducer)
        .with_partitioner(partitioner)
        .with_reduce_tasks(partitioner.total_years)
        .run(input_dir, output_dir, config)
}
