//! Test utilities for building export fixtures.
//!
//! This module provides in-memory tarballs, zips and whole export layouts
//! (scopes holding secondary archives) shared by unit, integration and CLI
//! tests.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use crate::formats::compression::CompressionCodec;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use scopex_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(&[("batch/alice@org.co.uk/a.zip", b"zip")]);
/// ```
#[must_use]
pub fn create_test_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut ar = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        ar.append_data(&mut header, path, *data).unwrap();
    }
    ar.into_inner().unwrap()
}

/// Creates an in-memory deflated ZIP archive from a list of entries.
///
/// Names ending in `/` become directory entries.
///
/// # Examples
///
/// ```
/// use scopex_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("Takeout/", b""), ("Takeout/Mail/all.mbox", b"mail")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (path, data) in entries {
        if path.ends_with('/') {
            zip.add_directory(*path, options).unwrap();
        } else {
            zip.start_file(*path, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Compresses `data` with `codec`.
#[must_use]
pub fn compress(data: &[u8], codec: CompressionCodec) -> Vec<u8> {
    match codec {
        CompressionCodec::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Zstd => zstd::stream::encode_all(Cursor::new(data), 3).unwrap(),
    }
}

enum Item {
    Archive {
        name: String,
        files: Vec<(String, Vec<u8>)>,
    },
    File {
        name: String,
        data: Vec<u8>,
    },
}

/// Builder for export layouts: scopes holding secondary zips and plain files.
///
/// The same layout can be rendered as a directory tree, a tarball, or an
/// outer zip, all with identical relative paths under the batch folder.
///
/// # Examples
///
/// ```
/// use scopex_core::formats::compression::CompressionCodec;
/// use scopex_core::test_utils::ExportFixture;
///
/// let fixture = ExportFixture::new()
///     .with_archive("alice@org.co.uk", "takeout-001.zip", &[("Mail/all.mbox", b"mail")])
///     .with_file("Resource: Room 4", "calendar.ics", b"ics");
///
/// let tarball = fixture.tarball("20241010", Some(CompressionCodec::Xz));
/// assert!(!tarball.is_empty());
/// ```
#[derive(Default)]
pub struct ExportFixture {
    items: Vec<(String, Item)>,
}

impl ExportFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secondary zip named `name` to `scope`.
    #[must_use]
    pub fn with_archive(mut self, scope: &str, name: &str, files: &[(&str, &[u8])]) -> Self {
        let files = files
            .iter()
            .map(|(path, data)| ((*path).to_string(), data.to_vec()))
            .collect();
        self.items.push((
            scope.to_string(),
            Item::Archive {
                name: name.to_string(),
                files,
            },
        ));
        self
    }

    /// Adds a plain file named `name` to `scope`.
    #[must_use]
    pub fn with_file(mut self, scope: &str, name: &str, data: &[u8]) -> Self {
        self.items.push((
            scope.to_string(),
            Item::File {
                name: name.to_string(),
                data: data.to_vec(),
            },
        ));
        self
    }

    /// Returns `(scope/name, bytes)` for every item, secondary zips rendered.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.items
            .iter()
            .map(|(scope, item)| match item {
                Item::Archive { name, files } => {
                    let refs: Vec<(&str, &[u8])> = files
                        .iter()
                        .map(|(path, data)| (path.as_str(), data.as_slice()))
                        .collect();
                    (format!("{scope}/{name}"), create_test_zip(&refs))
                }
                Item::File { name, data } => (format!("{scope}/{name}"), data.clone()),
            })
            .collect()
    }

    /// Writes the layout as an exploded directory tree under `root`.
    pub fn write_tree(&self, root: &Path) {
        for (relative, data) in self.entries() {
            let path = root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, data).unwrap();
        }
    }

    /// Renders the layout as a tarball under the `batch` folder.
    #[must_use]
    pub fn tarball(&self, batch: &str, codec: Option<CompressionCodec>) -> Vec<u8> {
        let entries = self.batched(batch);
        let refs: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, data)| (path.as_str(), data.as_slice()))
            .collect();
        let tar = create_test_tar(&refs);
        match codec {
            Some(codec) => compress(&tar, codec),
            None => tar,
        }
    }

    /// Renders the layout as an outer zip under the `batch` folder.
    #[must_use]
    pub fn zip(&self, batch: &str) -> Vec<u8> {
        let entries = self.batched(batch);
        let refs: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, data)| (path.as_str(), data.as_slice()))
            .collect();
        create_test_zip(&refs)
    }

    fn batched(&self, batch: &str) -> Vec<(String, Vec<u8>)> {
        self.entries()
            .into_iter()
            .map(|(relative, data)| (format!("{batch}/{relative}"), data))
            .collect()
    }
}
