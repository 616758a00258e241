//! IO utilities for file operations
//!
//! This module provides utilities for discovering input partitions, naming output
//! partitions and reading text records.

pub mod lines;
pub mod paths;

// Re-export commonly used functions for convenience
pub use lines::{LineWriter, read_lines};
pub use paths::{
    COUNTERS_FILE, SUCCESS_MARKER, find_input_partitions, is_hidden_file_name, part_file_name,
    prepare_output_dir,
};
