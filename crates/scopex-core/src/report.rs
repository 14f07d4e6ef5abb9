//! Extraction run reporting.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Report of an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Payload files written, including files expanded from secondary
    /// archives. Secondary archives themselves are not counted.
    pub files_extracted: usize,

    /// Number of secondary archives expanded and removed.
    pub archives_expanded: usize,

    /// Entries skipped because they were not admitted or not regular files.
    pub entries_skipped: usize,

    /// Total bytes written to disk, including transient archive files.
    pub bytes_written: u64,

    /// Admitted scope tokens that contributed at least one file.
    pub scopes: BTreeSet<String>,

    /// Duration of the run.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds another report into this one.
    ///
    /// Durations are not summed; the caller measures wall time of the whole
    /// run.
    pub fn merge(&mut self, other: Self) {
        self.files_extracted += other.files_extracted;
        self.archives_expanded += other.archives_expanded;
        self.entries_skipped += other.entries_skipped;
        self.bytes_written = self.bytes_written.saturating_add(other.bytes_written);
        self.scopes.extend(other.scopes);
    }

    /// Returns the number of admitted scopes that produced output.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

/// Callback trait for progress reporting during a run.
///
/// The trait requires `Send` so a callback can be shared between per-scope
/// workers behind a lock.
///
/// # Examples
///
/// ```
/// use scopex_core::ProgressCallback;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path) {
///         println!("extracting {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_archive_expanded(&mut self, archive: &Path, files: usize) {
///         println!("expanded {} ({files} files)", archive.display());
///     }
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an admitted entry is materialized.
    fn on_entry_start(&mut self, path: &Path);

    /// Called after bytes have been written to the destination.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after a secondary archive has been expanded and removed.
    fn on_archive_expanded(&mut self, archive: &Path, files: usize);

    /// Called after an admitted entry has been fully processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once when the whole run has finished successfully.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_archive_expanded(&mut self, _archive: &Path, _files: usize) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
