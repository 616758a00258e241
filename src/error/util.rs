//! Utility functions for error handling
//!
//! This module provides utility functions to open files and check directories with
//! errors that carry the offending path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(PipelineError::path(path, format!("File not found, needed for: {purpose}")));
    }

    if !path.is_file() {
        return Err(PipelineError::path(
            path,
            format!("Path is not a file, expected a file for: {purpose}"),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        PipelineError::path_with_source(path, context, e)
    })
}

/// Safely create (or truncate) a file with rich error information
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    fs::File::create(path).map_err(|e| {
        PipelineError::path_with_source(path, format!("Failed to create file for: {purpose}"), e)
    })
}

/// Check if a directory exists and is readable, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(PipelineError::path(
            path,
            format!("Directory not found, needed for: {purpose}"),
        ));
    }

    if !path.is_dir() {
        return Err(PipelineError::path(
            path,
            format!("Path is not a directory, expected a directory for: {purpose}"),
        ));
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check directory permissions".to_string()
                }
                _ => format!("Failed to access directory for: {purpose}"),
            };
            Err(PipelineError::path_with_source(path, context, e))
        }
    }
}
