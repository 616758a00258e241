//! Logging utilities
//!
//! Job-level log lines share one format so a run over many stages reads as a single
//! timeline.

use std::path::Path;
use std::time::Duration;

use crate::engine::Counters;

/// Log the start of a job
///
/// # Arguments
/// * `job_name` - Name of the job, as used in reports
/// * `input` - Directory the job reads its partitions from
pub fn log_job_start(job_name: &str, input: &Path) {
    log::info!("Job \"{job_name}\": reading {}", input.display());
}

/// Log the end of a job
///
/// # Arguments
/// * `job_name` - Name of the job, as used in reports
/// * `output` - Directory the job wrote into
/// * `records` - Number of output records written
/// * `elapsed` - Wall-clock duration of the job
pub fn log_job_complete(job_name: &str, output: &Path, records: usize, elapsed: Duration) {
    log::info!(
        "Job \"{job_name}\": wrote {records} records to {} in {elapsed:?}",
        output.display()
    );
}

/// Log a reference file line that was skipped
///
/// # Arguments
/// * `path` - The reference file
/// * `line_number` - One-based line number
/// * `line` - The offending line
pub fn log_skipped_line(path: &Path, line_number: usize, line: &str) {
    log::warn!("Skipping malformed line {line_number} of {}: \"{line}\"", path.display());
}

/// Log every counter of a finished job, one line per counter
pub fn log_counters(job_name: &str, counters: &Counters) {
    if counters.is_empty() {
        log::info!("{job_name}: no counters recorded");
        return;
    }
    for (name, value) in counters.iter() {
        log::info!("{job_name}: {name} : {value}");
    }
}
