//! Error handling for the pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

/// Specialized error type for pipeline jobs
///
/// Only job-level failures surface here. Per-record problems (bad fields, unparsable
/// codes, malformed lines) are counted and logged by the stage that meets them and never
/// become a `PipelineError`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error with a path-specific IO operation
    #[error("IO error at {path}: {message}")]
    PathIo {
        /// Path the operation was working on
        path: PathBuf,
        /// What went wrong
        message: String,
        /// Underlying IO error, if any
        #[source]
        source: Option<io::Error>,
    },

    /// Broadcast reference data could not be loaded; always fatal for the job
    #[error("Unable to load {what} [{path}]: {reason}")]
    Reference {
        /// Which reference set failed
        what: String,
        /// The reference file
        path: PathBuf,
        /// Why it failed
        reason: String,
    },

    /// Invalid job or pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The output directory already holds results of an earlier run
    #[error("Output directory {0} already contains job output")]
    OutputExists(PathBuf),

    /// Error serializing the counter report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a reference-data error
    #[must_use]
    pub fn reference(
        what: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Reference {
            what: what.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a path error without an underlying IO source
    #[must_use]
    pub fn path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PathIo {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a path error wrapping an IO source
    #[must_use]
    pub fn path_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::PathIo {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
