//! Configuration for pipeline jobs.
//!
//! Stage-specific switches (stop words, case sensitivity, ordering) live next to their
//! stage; this module holds what every job shares.

use std::path::{Path, PathBuf};

/// Environment variable overriding the reference data directory
pub const REFERENCE_DIR_ENV: &str = "NEISS_REFERENCE_DIR";

/// Environment variable overriding the default number of reduce tasks
pub const REDUCE_TASKS_ENV: &str = "NEISS_REDUCE_TASKS";

/// Reference directory used when neither the CLI nor the environment names one
pub const DEFAULT_REFERENCE_DIR: &str = "reference-data";

/// Reduce tasks used by stages that don't fix their own partition count
pub const DEFAULT_REDUCE_TASKS: usize = 24;

/// Configuration shared by all pipeline jobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the broadcast reference files (`Gender.dat`, `StopWords.dat`, ...)
    pub reference_dir: PathBuf,
    /// Number of reduce partitions for stages whose partitioning isn't fixed
    pub reduce_tasks: usize,
    /// Show progress bars for the map and reduce phases
    pub show_progress: bool,
    /// Write `_SUCCESS` and `_COUNTERS.json` next to the part files
    pub write_markers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_dir: get_reference_dir()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_DIR)),
            reduce_tasks: get_reduce_tasks().unwrap_or(DEFAULT_REDUCE_TASKS),
            show_progress: true,
            write_markers: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference data directory
    #[must_use]
    pub fn with_reference_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.reference_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the number of reduce tasks
    ///
    /// Zero is accepted; partitioners then route everything to partition 0 and the
    /// substrate runs a single reduce task.
    #[must_use]
    pub fn with_reduce_tasks(mut self, reduce_tasks: usize) -> Self {
        self.reduce_tasks = reduce_tasks;
        self
    }

    /// Enable or disable progress bars
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Enable or disable the `_SUCCESS` / `_COUNTERS.json` markers
    #[must_use]
    pub fn with_markers(mut self, write_markers: bool) -> Self {
        self.write_markers = write_markers;
        self
    }

    /// Path of a reference file inside the reference directory
    #[must_use]
    pub fn reference_file(&self, file_name: &str) -> PathBuf {
        self.reference_dir.join(file_name)
    }
}

/// Helper function to get the reference directory from the environment
#[must_use]
pub fn get_reference_dir() -> Option<PathBuf> {
    std::env::var_os(REFERENCE_DIR_ENV)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Helper function to get the reduce task count from the environment
#[must_use]
pub fn get_reduce_tasks() -> Option<usize> {
    std::env::var(REDUCE_TASKS_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}
