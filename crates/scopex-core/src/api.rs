//! High-level public API for export extraction.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::Extractor;
use crate::formats::OpenedContainer;
use crate::formats::open_container;
use crate::types::DestDir;

/// Extracts the admitted scopes of an export into `dest_dir`.
///
/// The source may be a compressed tarball, a zip archive, or a directory;
/// its type is detected from content. Secondary archives inside admitted
/// scopes are expanded in place and deleted.
///
/// # Arguments
///
/// * `source` - Export tarball, zip, or directory
/// * `dest_dir` - Existing, writable destination directory
/// * `config` - Admission rules and run settings
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The destination is missing or not writable
/// - The destination is a directory source or lies inside it
/// - The source is not a recognized container
/// - Any entry fails to extract (the run stops at the first failure)
///
/// # Examples
///
/// ```no_run
/// use scopex_core::ExtractionConfig;
/// use scopex_core::ScopeRule;
/// use scopex_core::extract_export;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractionConfig::with_rules(vec![ScopeRule::domain_suffix("@org.co.uk")]);
/// let report = extract_export("export.tar.xz", "/srv/extracted", &config)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_export<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest_dir: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let mut noop = NoopProgress;
    extract_export_with_progress(source, dest_dir, config, &mut noop)
}

/// Extracts an export with progress callbacks.
///
/// Same as [`extract_export`], reporting each admitted entry to `progress`.
/// [`ProgressCallback::on_complete`] is called once after a successful run.
///
/// # Errors
///
/// Same as [`extract_export`].
pub fn extract_export_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest_dir: Q,
    config: &ExtractionConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let source = source.as_ref();
    let extractor = Extractor::new(config.clone())?;
    let dest = DestDir::new(dest_dir.as_ref())?;

    let mut report = match open_container(source)? {
        OpenedContainer::Directory(mut dir) => {
            check_outside_source(dir.root(), &dest)?;
            extractor.run_directory(&mut dir, &dest, progress)?
        }
        OpenedContainer::Archive(mut archive) => {
            extractor.run(archive.as_mut(), &dest, progress)?
        }
    };
    report.duration = start.elapsed();
    progress.on_complete();

    info!(
        source = %source.display(),
        files = report.files_extracted,
        archives = report.archives_expanded,
        scopes = report.scope_count(),
        "extraction complete"
    );
    Ok(report)
}

/// Rejects a destination equal to or nested in a directory source.
///
/// Materializing into the source tree would truncate the very files being
/// read.
fn check_outside_source(source_root: &Path, dest: &DestDir) -> Result<()> {
    let source_root = source_root
        .canonicalize()
        .map_err(|e| ExtractionError::read(source_root, e))?;
    if dest.as_path().starts_with(&source_root) {
        return Err(ExtractionError::InvalidConfig {
            reason: format!(
                "destination {} is inside the source directory {}",
                dest.as_path().display(),
                source_root.display()
            ),
        });
    }
    Ok(())
}
