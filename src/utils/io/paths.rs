//! Path utilities for job input and output directories
//!
//! Every regular file in an input directory is one partition. Files whose name starts
//! with `_` or `.` are bookkeeping (`_SUCCESS`, `_COUNTERS.json`, editor droppings) and are
//! skipped, so one stage's output directory can be fed straight into the next stage.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::util::validate_directory;
use crate::error::{PipelineError, Result};

/// Marker written into an output directory once a job completes
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Counter report written into an output directory once a job completes
pub const COUNTERS_FILE: &str = "_COUNTERS.json";

/// Whether a file name denotes a bookkeeping file rather than data
#[must_use]
pub fn is_hidden_file_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Find all input partitions in a directory, sorted by file name
///
/// # Arguments
/// * `dir` - The input directory
///
/// # Returns
/// Paths of every data file in the directory, in name order
///
/// # Errors
/// Returns an error if the directory is missing or can't be listed
pub fn find_input_partitions(dir: &Path) -> Result<Vec<PathBuf>> {
    validate_directory(dir, "reading job input")?;

    let entries = fs::read_dir(dir)
        .map_err(|e| PipelineError::path_with_source(dir, "Failed to list input directory", e))?;

    let mut partitions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            PipelineError::path_with_source(dir, "Failed to read directory entry", e)
        })?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_none_or(is_hidden_file_name);
        if path.is_file() && !hidden {
            partitions.push(path);
        }
    }

    partitions.sort();
    Ok(partitions)
}

/// Name of an output partition file
///
/// Map-only jobs write `part-m-NNNNN`, jobs with a reduce phase write `part-r-NNNNN`.
#[must_use]
pub fn part_file_name(from_reduce: bool, index: usize) -> String {
    let phase = if from_reduce { 'r' } else { 'm' };
    format!("part-{phase}-{index:05}")
}

/// Create the output directory, refusing to overwrite an earlier run
///
/// # Errors
/// Returns `PipelineError::OutputExists` if the directory already holds part files or a
/// success marker.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        validate_directory(dir, "writing job output")?;
        let entries = fs::read_dir(dir).map_err(|e| {
            PipelineError::path_with_source(dir, "Failed to list output directory", e)
        })?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("part-") || name == SUCCESS_MARKER {
                return Err(PipelineError::OutputExists(dir.to_path_buf()));
            }
        }
        return Ok(());
    }

    fs::create_dir_all(dir)
        .map_err(|e| PipelineError::path_with_source(dir, "Failed to create output directory", e))
}
