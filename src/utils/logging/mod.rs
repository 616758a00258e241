//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use log::{log_counters, log_job_complete, log_job_start, log_skipped_line};
pub use progress::{create_phase_progress_bar, finish_progress_bar};
