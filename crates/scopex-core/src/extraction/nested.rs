//! In-place expansion of secondary zip archives.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::types::EntryPath;

use super::materialize::CopyError;
use super::materialize::write_file;

/// Expands the zip at `archive_file` into `target_dir`, then deletes it.
///
/// Inner entries keep their relative paths under `target_dir`. Only one
/// level is expanded: a zip inside the zip is written out as a plain file.
/// Returns the number of payload files written; `report` is updated with
/// files and bytes as they are written.
///
/// On failure the archive is left in place, files already expanded are not
/// removed, and the failing path is logged once.
///
/// # Errors
///
/// - `ExtractionError::ArchiveFormat` if the archive or one of its entries
///   is corrupt, or an entry would be written over the archive itself.
/// - `ExtractionError::PathTraversal` if an entry name escapes
///   `target_dir`.
/// - `ExtractionError::Write` if output cannot be written or the archive
///   cannot be deleted afterwards.
pub fn expand_archive(
    archive_file: &Path,
    target_dir: &Path,
    report: &mut ExtractionReport,
    progress: &mut dyn ProgressCallback,
) -> Result<usize> {
    let files = expand_entries(archive_file, target_dir, report, progress).inspect_err(|e| {
        error!(archive = %archive_file.display(), error = %e, "failed to expand archive");
    })?;

    std::fs::remove_file(archive_file).map_err(|e| ExtractionError::write(archive_file, e))?;
    info!(archive = %archive_file.display(), files, "expanded and removed archive");
    Ok(files)
}

fn expand_entries(
    archive_file: &Path,
    target_dir: &Path,
    report: &mut ExtractionReport,
    progress: &mut dyn ProgressCallback,
) -> Result<usize> {
    let file = File::open(archive_file).map_err(|e| ExtractionError::read(archive_file, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| archive_format(archive_file, e.to_string()))?;

    let mut files = 0;
    for index in 0..archive.len() {
        let mut inner = archive
            .by_index(index)
            .map_err(|e| archive_format(archive_file, e.to_string()))?;

        let raw_path = inner
            .enclosed_name()
            .ok_or_else(|| ExtractionError::PathTraversal {
                path: PathBuf::from(inner.name()),
            })?;
        let path = EntryPath::validate(&raw_path)?;
        if path.is_empty() {
            continue;
        }
        let output = target_dir.join(path.as_path());

        if inner.is_dir() {
            std::fs::create_dir_all(&output).map_err(|e| ExtractionError::write(&output, e))?;
            continue;
        }
        if !inner.is_file() {
            debug!(entry = %path, "skipping non-file archive entry");
            report.entries_skipped += 1;
            continue;
        }

        if output == archive_file {
            return Err(archive_format(
                archive_file,
                format!("entry {path} overwrites its own archive"),
            ));
        }

        let bytes = write_file(&mut inner, &output).map_err(|e| match e {
            CopyError::Read(e) => archive_format(archive_file, format!("entry {path}: {e}")),
            CopyError::Write(e) => ExtractionError::write(&output, e),
        })?;

        files += 1;
        report.files_extracted += 1;
        report.bytes_written = report.bytes_written.saturating_add(bytes);
        progress.on_bytes_written(bytes);
    }

    Ok(files)
}

fn archive_format(path: &Path, reason: String) -> ExtractionError {
    ExtractionError::ArchiveFormat {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use crate::test_utils::create_test_zip;
    use tempfile::TempDir;

    fn write_archive(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_expand_and_delete() {
        let temp = TempDir::new().unwrap();
        let scope = temp.path().join("alice@org.co.uk");
        std::fs::create_dir_all(&scope).unwrap();
        let archive = write_archive(
            &scope,
            "takeout-001.zip",
            &create_test_zip(&[("Takeout/Mail/all.mbox", b"mail"), ("Takeout/Drive/doc.txt", b"doc")]),
        );

        let mut report = ExtractionReport::new();
        let files = expand_archive(&archive, &scope, &mut report, &mut NoopProgress).unwrap();

        assert_eq!(files, 2);
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.bytes_written, 7);
        assert!(!archive.exists());
        assert_eq!(std::fs::read(scope.join("Takeout/Mail/all.mbox")).unwrap(), b"mail");
        assert_eq!(std::fs::read(scope.join("Takeout/Drive/doc.txt")).unwrap(), b"doc");
    }

    #[test]
    fn test_inner_zip_not_expanded() {
        let temp = TempDir::new().unwrap();
        let inner = create_test_zip(&[("deep.txt", b"deep")]);
        let archive = write_archive(
            temp.path(),
            "outer.zip",
            &create_test_zip(&[("nested/inner.zip", &inner)]),
        );

        let mut report = ExtractionReport::new();
        expand_archive(&archive, temp.path(), &mut report, &mut NoopProgress).unwrap();

        assert_eq!(std::fs::read(temp.path().join("nested/inner.zip")).unwrap(), inner);
        assert!(!temp.path().join("nested/deep.txt").exists());
    }

    #[test]
    fn test_traversal_rejected_and_archive_kept() {
        let temp = TempDir::new().unwrap();
        let scope = temp.path().join("alice@org.co.uk");
        std::fs::create_dir_all(&scope).unwrap();
        let archive = write_archive(
            &scope,
            "evil.zip",
            &create_test_zip(&[("../bob@org.co.uk/planted.txt", b"x")]),
        );

        let mut report = ExtractionReport::new();
        let result = expand_archive(&archive, &scope, &mut report, &mut NoopProgress);

        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
        assert!(archive.exists());
        assert!(!temp.path().join("bob@org.co.uk").exists());
    }

    #[test]
    fn test_corrupt_archive_kept() {
        let temp = TempDir::new().unwrap();
        let archive = write_archive(temp.path(), "broken.zip", b"PK\x03\x04 garbage");

        let mut report = ExtractionReport::new();
        let result = expand_archive(&archive, temp.path(), &mut report, &mut NoopProgress);

        assert!(matches!(result, Err(ExtractionError::ArchiveFormat { .. })));
        assert!(archive.exists());
        assert_eq!(report.files_extracted, 0);
    }

    #[test]
    fn test_entry_named_like_archive_keeps_archive() {
        let temp = TempDir::new().unwrap();
        let inner = create_test_zip(&[("deep.txt", b"deep")]);
        let original = create_test_zip(&[("a.zip", &inner), ("other.txt", b"other")]);
        let archive = write_archive(temp.path(), "a.zip", &original);

        let mut report = ExtractionReport::new();
        let result = expand_archive(&archive, temp.path(), &mut report, &mut NoopProgress);

        match result {
            Err(ExtractionError::ArchiveFormat { path, reason }) => {
                assert_eq!(path, archive);
                assert!(reason.contains("overwrites its own archive"));
            }
            other => panic!("expected ArchiveFormat, got {other:?}"),
        }
        assert_eq!(std::fs::read(&archive).unwrap(), original);
        assert_eq!(report.files_extracted, 0);
    }

    #[test]
    fn test_directory_entries_create_directories() {
        let temp = TempDir::new().unwrap();
        let archive = write_archive(
            temp.path(),
            "dirs.zip",
            &create_test_zip(&[("empty/", b""), ("full/file.txt", b"x")]),
        );

        let mut report = ExtractionReport::new();
        let files = expand_archive(&archive, temp.path(), &mut report, &mut NoopProgress).unwrap();

        assert_eq!(files, 1);
        assert!(temp.path().join("empty").is_dir());
        assert!(temp.path().join("full/file.txt").is_file());
    }
}
