//! Compressed tarball container.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::EntryPath;

use super::compression::CompressionCodec;
use super::traits::Container;
use super::traits::ContainerEntry;
use super::traits::EntryVisitor;

/// Offset and value of the POSIX ustar magic in a tar header.
const USTAR_MAGIC_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// A tarball export container read as a single forward stream.
///
/// The first path segment of each entry is the export batch folder, so the
/// scope token sits at position 2.
pub struct TarContainer {
    path: PathBuf,
    codec: Option<CompressionCodec>,
    archive: tar::Archive<Box<dyn Read>>,
}

impl TarContainer {
    /// Opens a tarball, detecting the compression codec from magic bytes.
    ///
    /// Uncompressed ustar tarballs are accepted as well.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Read` if the file cannot be opened and
    /// `ExtractionError::ContainerFormat` if it is neither a compressed nor
    /// a plain tarball.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| ExtractionError::read(&path, e))?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);

        let header = reader
            .fill_buf()
            .map_err(|e| ExtractionError::read(&path, e))?;
        let codec = CompressionCodec::from_magic(header);
        if codec.is_none() && !is_ustar_header(header) {
            return Err(ExtractionError::ContainerFormat {
                path,
                reason: "not a recognized compressed tarball".to_string(),
            });
        }

        let stream: Box<dyn Read> = match codec {
            Some(codec) => codec
                .decoder(reader)
                .map_err(|e| container_format(&path, &e))?,
            None => Box::new(reader),
        };

        debug!(
            path = %path.display(),
            codec = codec.map_or("none", CompressionCodec::name),
            "opened tarball container"
        );

        Ok(Self {
            path,
            codec,
            archive: tar::Archive::new(stream),
        })
    }

    /// Returns the detected compression codec, `None` for a plain tarball.
    #[must_use]
    pub fn codec(&self) -> Option<CompressionCodec> {
        self.codec
    }
}

impl Container for TarContainer {
    fn format_name(&self) -> &str {
        match self.codec {
            Some(CompressionCodec::Gzip) => "tar.gz",
            Some(CompressionCodec::Bzip2) => "tar.bz2",
            Some(CompressionCodec::Xz) => "tar.xz",
            Some(CompressionCodec::Zstd) => "tar.zst",
            None => "tar",
        }
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn default_scope_depth(&self) -> usize {
        2
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let entries = self
            .archive
            .entries()
            .map_err(|e| container_format(&self.path, &e))?;

        // A broken first header means the stream is not a tarball at all;
        // later failures are read errors on a recognized container.
        let mut recognized = false;
        for entry in entries {
            let mut entry = entry.map_err(|e| {
                if recognized {
                    ExtractionError::read(&self.path, e)
                } else {
                    container_format(&self.path, &e)
                }
            })?;
            recognized = true;

            let raw_path = entry
                .path()
                .map_err(|e| ExtractionError::read(&self.path, e))?
                .into_owned();
            let path = EntryPath::validate(&raw_path)?;
            let kind = EntryKind::from_tar(entry.header().entry_type());
            let origin = self.path.join(path.as_path());

            visit(ContainerEntry::streamed(path, kind, origin, &mut entry))?;
        }

        Ok(())
    }
}

fn is_ustar_header(header: &[u8]) -> bool {
    header
        .get(USTAR_MAGIC_OFFSET..USTAR_MAGIC_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|magic| magic == USTAR_MAGIC)
}

fn container_format(path: &Path, err: &std::io::Error) -> ExtractionError {
    ExtractionError::ContainerFormat {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
