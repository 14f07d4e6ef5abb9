//! Error conversion utilities for CLI.
//!
//! Converts scopex-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use scopex_core::ExtractionError;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, source: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Security violation: export '{}' contains an entry escaping its directory: '{}'\n\
                 HINT: The export or one of its secondary archives may be tampered with.",
                source.display(),
                path.display()
            )
        }
        ExtractionError::ContainerFormat { path, reason } => {
            anyhow!(
                "Unrecognized export container '{}': {}\n\
                 HINT: Supported sources: tar.xz, tar.gz, tar.bz2, tar.zst, tar, zip, or a directory.",
                path.display(),
                reason
            )
        }
        ExtractionError::ArchiveFormat { path, reason } => {
            anyhow!(
                "Invalid secondary archive '{}': {}\n\
                 HINT: The archive was left in place; re-download the export or use \
                 --archive-suffix to change which files are expanded.",
                path.display(),
                reason
            )
        }
        ExtractionError::Write { path, source: io_err } => {
            anyhow!(
                "Failed to write '{}': {}\n\
                 HINT: Check free space and permissions on the destination.",
                path.display(),
                io_err
            )
        }
        ExtractionError::Read { path, source: io_err } => {
            anyhow!("Failed to read '{}': {}", path.display(), io_err)
        }
        ExtractionError::InvalidConfig { reason } => {
            anyhow!(
                "Invalid configuration: {reason}\n\
                 HINT: Pass at least one non-empty --domain-suffix or --resource-prefix, \
                 and keep --destination outside a directory --source."
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                source.display(),
                io_err
            )
        }
    }
}

/// Adds context to a generic error about extraction runs
pub fn add_source_context<T>(
    result: Result<T, ExtractionError>,
    source: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, source))
}
