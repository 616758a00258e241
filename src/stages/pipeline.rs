//! Runs every stage in dependency order under one working directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::broadcast::CodeTables;
use crate::config::PipelineConfig;
use crate::engine::{Counters, JobReport};
use crate::error::{PipelineError, Result};
use crate::error::util::validate_directory;
use crate::stages::swap_word_count::SwapOptions;
use crate::stages::word_frequency::WordFrequencyOptions;
use crate::stages::{
    product_filter, sort_by_year, swap_word_count, word_count, word_frequency, word_totals,
};
use crate::utils::logging::{log_job_complete, log_job_start};

/// Name of the whole run in logs
const PIPELINE_NAME: &str = "NEISS pipeline";

/// Output directory of each stage, relative to the working directory
pub const FILTERED_DIR: &str = "filtered";
pub const WORD_FREQUENCY_DIR: &str = "word-frequency";
pub const WORD_COUNT_DIR: &str = "word-count";
pub const SORTED_BY_YEAR_DIR: &str = "sorted-by-year";
pub const WORD_TOTALS_DIR: &str = "word-totals";
pub const RANKED_DIR: &str = "ranked";

/// Options of the stages that take any
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub word_frequency: WordFrequencyOptions,
    pub swap: SwapOptions,
}

impl PipelineOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_word_frequency(mut self, options: WordFrequencyOptions) -> Self {
        self.word_frequency = options;
        self
    }

    #[must_use]
    pub fn with_swap(mut self, options: SwapOptions) -> Self {
        self.swap = options;
        self
    }
}

/// Reports of every job of a pipeline run, in run order
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub work_dir: PathBuf,
    pub jobs: Vec<JobReport>,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Counters of the job with the given name
    #[must_use]
    pub fn counters(&self, job_name: &str) -> Option<&Counters> {
        self.jobs
            .iter()
            .find(|job| job.name == job_name)
            .map(|job| &job.counters)
    }
}

/// Run all six jobs: filter, then word frequency, per-record totals and year sort, then
/// word totals and the ranking
///
/// Reference data is loaded before the working directory is created, so a run that
/// can't load it leaves nothing behind.
///
/// # Arguments
/// * `input_dir` - Directory of raw NEISS partitions
/// * `work_dir` - Directory receiving one sub-directory per stage
/// * `config` - Shared job configuration
/// * `options` - Per-stage options
///
/// # Returns
/// * `Result<PipelineReport>` - Reports of every job, or the first job failure
pub fn run(
    input_dir: &Path,
    work_dir: &Path,
    config: &PipelineConfig,
    options: &PipelineOptions,
) -> Result<PipelineReport> {
    let start = Instant::now();
    log_job_start(PIPELINE_NAME, input_dir);

    validate_directory(input_dir, "raw NEISS input")?;
    let tables = Arc::new(CodeTables::load(&config.reference_dir)?);
    let stop_words = Arc::new(word_frequency::load_stop_words(config, &options.word_frequency)?);

    fs::create_dir_all(work_dir).map_err(|e| {
        PipelineError::path_with_source(work_dir, "Failed to create pipeline working directory", e)
    })?;

    let filtered = work_dir.join(FILTERED_DIR);
    let frequencies = work_dir.join(WORD_FREQUENCY_DIR);
    let totals = work_dir.join(WORD_TOTALS_DIR);

    let mut jobs = Vec::with_capacity(6);
    jobs.push(product_filter::run_with_tables(input_dir, &filtered, config, tables)?);
    jobs.push(word_frequency::run_with_stop_words(
        &filtered,
        &frequencies,
        config,
        &options.word_frequency,
        stop_words,
    )?);
    jobs.push(word_count::run(&frequencies, &work_dir.join(WORD_COUNT_DIR), config)?);
    jobs.push(sort_by_year::run(&filtered, &work_dir.join(SORTED_BY_YEAR_DIR), config)?);
    jobs.push(word_totals::run(&frequencies, &totals, config)?);
    jobs.push(swap_word_count::run(&totals, &work_dir.join(RANKED_DIR), config, &options.swap)?);

    let report = PipelineReport {
        work_dir: work_dir.to_path_buf(),
        jobs,
        elapsed: start.elapsed(),
    };
    let records: usize = report.jobs.iter().map(|job| job.output_records).sum();
    log_job_complete(PIPELINE_NAME, work_dir, records, report.elapsed);
    info!("Pipeline finished {} jobs", report.jobs.len());
    Ok(report)
}
