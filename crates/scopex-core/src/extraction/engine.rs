//! Extraction orchestrator.

use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;
use tracing::info;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::ScopeMatcher;
use crate::formats::Container;
use crate::formats::ContainerEntry;
use crate::formats::DirectoryContainer;
use crate::types::DestDir;
use crate::types::EntryPath;

use super::materialize::materialize;
use super::nested::expand_archive;

/// Returns the scope token of `path` if it is admitted at `depth`.
///
/// The segment at `depth` must name a directory, so the path needs more than
/// `depth` segments. A regular file that sits exactly at the scope position
/// (`20241010/alice@org.co.uk`) is deliberately not a scope member, even
/// though its name matches a rule. Segments at other positions are never
/// inspected.
///
/// # Examples
///
/// ```
/// use scopex_core::extraction::admitted_scope;
/// use scopex_core::{EntryPath, ScopeMatcher, ScopeRule};
/// use std::path::Path;
///
/// let matcher = ScopeMatcher::new(vec![ScopeRule::domain_suffix("@org.co.uk")]);
/// let path = EntryPath::validate(Path::new("20241010/alice@org.co.uk/a.zip"))?;
///
/// assert_eq!(admitted_scope(&matcher, &path, 2), Some("alice@org.co.uk"));
/// assert_eq!(admitted_scope(&matcher, &path, 1), None);
/// # Ok::<(), scopex_core::ExtractionError>(())
/// ```
#[must_use]
pub fn admitted_scope<'p>(
    matcher: &ScopeMatcher,
    path: &'p EntryPath,
    depth: usize,
) -> Option<&'p str> {
    if path.len() <= depth {
        return None;
    }
    path.segment(depth)
        .filter(|segment| matcher.is_admitted(segment))
}

/// Drives one pass over a container: admission, materialization and nested
/// expansion.
///
/// # Examples
///
/// ```no_run
/// use scopex_core::formats::TarContainer;
/// use scopex_core::{DestDir, ExtractionConfig, Extractor, NoopProgress, ScopeRule};
///
/// # fn main() -> Result<(), scopex_core::ExtractionError> {
/// let config = ExtractionConfig::with_rules(vec![ScopeRule::domain_suffix("@org.co.uk")]);
/// let extractor = Extractor::new(config)?;
///
/// let mut container = TarContainer::open("export.tar.xz")?;
/// let dest = DestDir::create("/srv/extracted")?;
/// let report = extractor.run(&mut container, &dest, &mut NoopProgress)?;
/// println!("{} files from {} scopes", report.files_extracted, report.scope_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor {
    config: ExtractionConfig,
    matcher: ScopeMatcher,
}

impl Extractor {
    /// Creates an extractor after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidConfig` if the configuration is
    /// invalid.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let matcher = config.matcher();
        Ok(Self { config, matcher })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Returns the scope depth used for `container`.
    #[must_use]
    pub fn scope_depth(&self, container: &dyn Container) -> usize {
        self.config
            .scope_depth
            .unwrap_or_else(|| container.default_scope_depth())
    }

    /// Extracts every admitted file of `container` under `dest`.
    ///
    /// Entries are processed in container order. The first error aborts the
    /// run; files already written stay in place.
    ///
    /// # Errors
    ///
    /// Returns the first container, materialization or expansion error.
    pub fn run(
        &self,
        container: &mut dyn Container,
        dest: &DestDir,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let depth = self.scope_depth(container);
        debug!(
            source = %container.source_path().display(),
            format = container.format_name(),
            depth,
            "walking container"
        );

        let mut report = ExtractionReport::new();
        container.for_each_entry(&mut |entry| {
            self.process_entry(entry, depth, dest, &mut report, &mut *progress)
        })?;

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Extracts a directory container, one worker per admitted scope when
    /// `jobs > 1`.
    ///
    /// Falls back to [`Extractor::run`] when `jobs == 1` or the scope depth
    /// is not 1. In parallel mode top-level entries outside admitted scopes
    /// are not listed and therefore not counted as skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any worker, or
    /// `ExtractionError::Io` if the worker pool cannot be created.
    pub fn run_directory(
        &self,
        container: &mut DirectoryContainer,
        dest: &DestDir,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        if self.config.jobs <= 1 || self.scope_depth(container) != 1 {
            return self.run(container, dest, progress);
        }

        let start = Instant::now();
        let mut scopes = container.scope_names()?;
        scopes.retain(|name| self.matcher.is_admitted(name));
        info!(
            scopes = scopes.len(),
            jobs = self.config.jobs,
            "extracting directory scopes in parallel"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|e| ExtractionError::Io(std::io::Error::other(e)))?;

        let root = container.root().to_path_buf();
        let shared = Mutex::new(progress);
        let reports = pool.install(|| {
            scopes
                .par_iter()
                .map(|scope| {
                    let mut scoped = DirectoryContainer::scoped(&root, scope.as_str())?;
                    let mut worker_progress = SharedProgress { inner: &shared };
                    self.run(&mut scoped, dest, &mut worker_progress)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut report = ExtractionReport::new();
        for scope_report in reports {
            report.merge(scope_report);
        }
        report.duration = start.elapsed();
        Ok(report)
    }

    fn process_entry(
        &self,
        entry: ContainerEntry<'_>,
        depth: usize,
        dest: &DestDir,
        report: &mut ExtractionReport,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()> {
        if !entry.kind().is_file() {
            debug!(entry = %entry.path(), kind = ?entry.kind(), "skipping non-file entry");
            report.entries_skipped += 1;
            return Ok(());
        }

        let Some(scope) = admitted_scope(&self.matcher, entry.path(), depth) else {
            debug!(entry = %entry.path(), "skipping entry outside admitted scopes");
            report.entries_skipped += 1;
            return Ok(());
        };
        let scope = scope.to_string();
        let relative = entry.path().as_path().to_path_buf();
        let is_archive = entry
            .path()
            .file_name()
            .is_some_and(|name| self.config.is_secondary_archive(name));

        progress.on_entry_start(&relative);
        let (output, bytes) = materialize(entry, dest)?;
        report.bytes_written = report.bytes_written.saturating_add(bytes);
        progress.on_bytes_written(bytes);

        if report.scopes.insert(scope.clone()) {
            info!(scope = %scope, "extracting scope");
        }

        if is_archive {
            let target = output.parent().unwrap_or_else(|| dest.as_path());
            let files = expand_archive(&output, target, report, progress)?;
            report.archives_expanded += 1;
            progress.on_archive_expanded(&relative, files);
        } else {
            report.files_extracted += 1;
        }

        debug!(entry = %relative.display(), bytes, "extracted entry");
        progress.on_entry_complete(&relative);
        Ok(())
    }
}

/// Progress callback shared between per-scope workers.
struct SharedProgress<'a, 'p> {
    inner: &'a Mutex<&'p mut dyn ProgressCallback>,
}

impl SharedProgress<'_, '_> {
    fn with(&self, f: impl FnOnce(&mut dyn ProgressCallback)) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **guard);
    }
}

impl ProgressCallback for SharedProgress<'_, '_> {
    fn on_entry_start(&mut self, path: &Path) {
        self.with(|progress| progress.on_entry_start(path));
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.with(|progress| progress.on_bytes_written(bytes));
    }

    fn on_archive_expanded(&mut self, archive: &Path, files: usize) {
        self.with(|progress| progress.on_archive_expanded(archive, files));
    }

    fn on_entry_complete(&mut self, path: &Path) {
        self.with(|progress| progress.on_entry_complete(path));
    }

    fn on_complete(&mut self) {}
}
