//! Zip container for exports delivered as a single outer zip.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::EntryPath;

use super::traits::Container;
use super::traits::ContainerEntry;
use super::traits::EntryVisitor;

/// A zip export container.
///
/// Entries are read in central-directory order. Like tarballs, the first
/// segment is the batch folder and the scope token sits at position 2.
pub struct ZipContainer {
    path: PathBuf,
    archive: zip::ZipArchive<BufReader<File>>,
}

impl ZipContainer {
    /// Opens a zip container and reads its central directory.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Read` if the file cannot be opened and
    /// `ExtractionError::ContainerFormat` if it is not a readable zip.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| ExtractionError::read(&path, e))?;
        let archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
            ExtractionError::ContainerFormat {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!(path = %path.display(), entries = archive.len(), "opened zip container");
        Ok(Self { path, archive })
    }

    /// Returns the number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the container has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl Container for ZipContainer {
    fn format_name(&self) -> &str {
        "zip"
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn default_scope_depth(&self) -> usize {
        2
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        for index in 0..self.archive.len() {
            let mut file = self
                .archive
                .by_index(index)
                .map_err(|e| ExtractionError::read(&self.path, std::io::Error::other(e)))?;

            let raw_path = file
                .enclosed_name()
                .ok_or_else(|| ExtractionError::PathTraversal {
                    path: PathBuf::from(file.name()),
                })?;
            let path = EntryPath::validate(&raw_path)?;
            let kind = if file.is_dir() {
                EntryKind::Directory
            } else if file.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            let origin = self.path.join(path.as_path());

            visit(ContainerEntry::streamed(path, kind, origin, &mut file))?;
        }

        Ok(())
    }
}
