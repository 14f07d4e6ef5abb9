//! Error types for scoped extraction runs.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can abort an extraction run.
///
/// Every variant is fatal: the orchestrator stops at the first one and leaves
/// whatever it has already written in place.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The outer container could not be opened as a supported format.
    #[error("unrecognized container {path}: {reason}")]
    ContainerFormat {
        /// Path of the container.
        path: PathBuf,
        /// What went wrong while opening it.
        reason: String,
    },

    /// A secondary archive could not be opened or read as zip.
    #[error("invalid secondary archive {path}: {reason}")]
    ArchiveFormat {
        /// Path of the materialized archive, left on disk.
        path: PathBuf,
        /// What went wrong while reading it.
        reason: String,
    },

    /// Writing a materialized file or one of its parent directories failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading an entry stream or listing a directory failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An entry path is absolute or climbs out of its root with `..`.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry path.
        path: PathBuf,
    },

    /// The extraction configuration cannot be used.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Returns `true` if the error comes from an unreadable container or
    /// secondary archive rather than from an I/O fault.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopex_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::ArchiveFormat {
    ///     path: PathBuf::from("alice@org.co.uk/takeout-001.zip"),
    ///     reason: "invalid Zip archive".to_string(),
    /// };
    /// assert!(err.is_format_error());
    ///
    /// let err = ExtractionError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_format_error());
    /// ```
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::ContainerFormat { .. } | Self::ArchiveFormat { .. }
        )
    }

    /// Returns the path the error refers to, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ContainerFormat { path, .. }
            | Self::ArchiveFormat { path, .. }
            | Self::Write { path, .. }
            | Self::Read { path, .. }
            | Self::PathTraversal { path } => Some(path),
            Self::InvalidConfig { .. } | Self::Io(_) => None,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
