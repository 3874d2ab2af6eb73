//! Pipeline error types.
//!
//! Two kinds cover every failure the pipeline can hit: a file or
//! directory that cannot be read, and a file that reads fine but does
//! not have the shape the census export guarantees. Both are
//! deployment defects, not transient conditions, so there is no retry
//! machinery here.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by the data-loading pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source file or shard directory is missing or unreadable.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source file was read but its contents are not in the expected
    /// shape (missing column or property, bad number, bad geometry).
    #[error("{path}: {reason}")]
    Format {
        /// Path of the malformed file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}

impl PipelineError {
    /// Build an `Io` error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a `Format` error for the given path.
    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the I/O kind (missing/unreadable file or directory).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// True for the format kind (present but malformed file).
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Convenience alias used throughout the loaders.
pub type Result<T> = std::result::Result<T, PipelineError>;
