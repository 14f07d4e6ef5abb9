//! Container format detection.
//!
//! The container type is decided from magic bytes. File extensions are not
//! consulted, so a mislabeled export still opens with the right reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;

use super::compression::CompressionCodec;
use super::directory::DirectoryContainer;
use super::tar::TarContainer;
use super::traits::Container;
use super::zip::ZipContainer;

/// Bytes sniffed from the head of a file: one tar header block.
const SNIFF_LEN: u64 = 512;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Supported outer container types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    /// Exploded directory tree.
    Directory,
    /// Tarball, optionally compressed.
    Tar(Option<CompressionCodec>),
    /// Zip archive.
    Zip,
}

impl ContainerType {
    /// Returns a human-readable name for this container type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Tar(None) => "tar",
            Self::Tar(Some(CompressionCodec::Gzip)) => "tar.gz",
            Self::Tar(Some(CompressionCodec::Bzip2)) => "tar.bz2",
            Self::Tar(Some(CompressionCodec::Xz)) => "tar.xz",
            Self::Tar(Some(CompressionCodec::Zstd)) => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

/// Recognizes a file container type from its leading bytes.
///
/// # Examples
///
/// ```
/// use scopex_core::formats::compression::CompressionCodec;
/// use scopex_core::formats::detect::{ContainerType, sniff};
///
/// assert_eq!(sniff(b"PK\x03\x04rest"), Some(ContainerType::Zip));
/// assert_eq!(
///     sniff(&[0x1F, 0x8B, 0x08]),
///     Some(ContainerType::Tar(Some(CompressionCodec::Gzip)))
/// );
/// assert_eq!(sniff(b"plain text"), None);
/// ```
#[must_use]
pub fn sniff(header: &[u8]) -> Option<ContainerType> {
    if header.starts_with(&ZIP_MAGIC) || header.starts_with(&ZIP_EMPTY_MAGIC) {
        return Some(ContainerType::Zip);
    }
    if let Some(codec) = CompressionCodec::from_magic(header) {
        return Some(ContainerType::Tar(Some(codec)));
    }
    if header.get(257..262).is_some_and(|magic| magic == b"ustar") {
        return Some(ContainerType::Tar(None));
    }
    None
}

/// Detects the container type of `path`.
///
/// # Errors
///
/// Returns `ExtractionError::Read` if the path cannot be inspected and
/// `ExtractionError::ContainerFormat` if the file is no known container.
pub fn detect_container(path: &Path) -> Result<ContainerType> {
    let metadata = std::fs::metadata(path).map_err(|e| ExtractionError::read(path, e))?;
    if metadata.is_dir() {
        return Ok(ContainerType::Directory);
    }

    let file = File::open(path).map_err(|e| ExtractionError::read(path, e))?;
    let mut header = Vec::with_capacity(512);
    file.take(SNIFF_LEN)
        .read_to_end(&mut header)
        .map_err(|e| ExtractionError::read(path, e))?;

    sniff(&header).ok_or_else(|| ExtractionError::ContainerFormat {
        path: path.to_path_buf(),
        reason: "neither a directory, a tarball, nor a zip archive".to_string(),
    })
}

/// An opened source container.
///
/// Directory containers are kept concrete so they can be split per scope for
/// parallel workers.
pub enum OpenedContainer {
    /// Exploded directory tree.
    Directory(DirectoryContainer),
    /// Single-pass archive container (tarball or zip).
    Archive(Box<dyn Container>),
}

impl OpenedContainer {
    /// Returns the container as a trait object.
    pub fn as_container(&mut self) -> &mut dyn Container {
        match self {
            Self::Directory(dir) => dir,
            Self::Archive(archive) => archive.as_mut(),
        }
    }
}

impl std::fmt::Debug for OpenedContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory(dir) => f.debug_tuple("Directory").field(&dir.root()).finish(),
            Self::Archive(archive) => f
                .debug_tuple("Archive")
                .field(&archive.format_name())
                .field(&archive.source_path())
                .finish(),
        }
    }
}

/// Detects and opens the container at `path`.
///
/// # Errors
///
/// Returns the detection error, or the container's own open error.
pub fn open_container(path: &Path) -> Result<OpenedContainer> {
    let opened = match detect_container(path)? {
        ContainerType::Directory => OpenedContainer::Directory(DirectoryContainer::open(path)?),
        ContainerType::Tar(_) => OpenedContainer::Archive(Box::new(TarContainer::open(path)?)),
        ContainerType::Zip => OpenedContainer::Archive(Box::new(ZipContainer::open(path)?)),
    };
    Ok(opened)
}
