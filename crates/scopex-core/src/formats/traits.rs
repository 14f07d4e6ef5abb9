//! Uniform entry-iteration contract over outer containers.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::EntryPath;

/// One entry yielded by a [`Container`].
///
/// The entry's content can be opened once; [`ContainerEntry::open`] consumes
/// the entry. An entry that is never opened costs no content I/O.
pub struct ContainerEntry<'a> {
    path: EntryPath,
    kind: EntryKind,
    origin: PathBuf,
    content: Content<'a>,
}

enum Content<'a> {
    Stream(&'a mut dyn Read),
    OnDisk,
}

impl<'a> ContainerEntry<'a> {
    /// Creates an entry whose content is the given borrowed stream.
    ///
    /// `origin` names the entry in diagnostics, e.g. the container path
    /// joined with the entry path.
    pub fn streamed(
        path: EntryPath,
        kind: EntryKind,
        origin: PathBuf,
        reader: &'a mut dyn Read,
    ) -> Self {
        Self {
            path,
            kind,
            origin,
            content: Content::Stream(reader),
        }
    }

    /// Creates an entry backed by a file that is only opened on demand.
    pub fn on_disk(path: EntryPath, kind: EntryKind, file: PathBuf) -> Self {
        Self {
            path,
            kind,
            origin: file,
            content: Content::OnDisk,
        }
    }

    /// Returns the entry's path relative to the container root.
    #[must_use]
    pub fn path(&self) -> &EntryPath {
        &self.path
    }

    /// Returns the entry kind.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the location of the entry used in error messages.
    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Opens the entry content, consuming the entry.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Read` if an on-disk entry cannot be opened.
    pub fn open(self) -> Result<Box<dyn Read + 'a>> {
        match self.content {
            Content::Stream(reader) => Ok(Box::new(reader)),
            Content::OnDisk => {
                let file =
                    File::open(&self.origin).map_err(|e| ExtractionError::read(&self.origin, e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl std::fmt::Debug for ContainerEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerEntry")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Visitor invoked for every entry of a container.
pub type EntryVisitor<'v> = dyn FnMut(ContainerEntry<'_>) -> Result<()> + 'v;

/// A lazy, single-pass source of container entries.
///
/// Implementations yield entries in the order stored by the medium and hold
/// at most one entry's stream open at a time.
pub trait Container {
    /// Returns the container format name.
    fn format_name(&self) -> &str;

    /// Returns the path the container was opened from.
    fn source_path(&self) -> &Path;

    /// Returns the 1-based scope segment position for this container layout.
    fn default_scope_depth(&self) -> usize;

    /// Feeds every entry to `visit`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the medium or by `visit`.
    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct VecContainer {
        entries: Vec<(&'static str, Vec<u8>)>,
    }

    impl Container for VecContainer {
        fn format_name(&self) -> &str {
            "memory"
        }

        fn source_path(&self) -> &Path {
            Path::new("memory")
        }

        fn default_scope_depth(&self) -> usize {
            1
        }

        fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
            for (name, data) in &self.entries {
                let path = EntryPath::validate(Path::new(name))?;
                let mut reader = Cursor::new(data.as_slice());
                visit(ContainerEntry::streamed(
                    path,
                    EntryKind::File,
                    PathBuf::from(name),
                    &mut reader,
                ))?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_streamed_entry_reads_content() {
        let mut container = VecContainer {
            entries: vec![("a/one.txt", b"one".to_vec()), ("a/two.txt", b"two".to_vec())],
        };

        let mut seen = Vec::new();
        container
            .for_each_entry(&mut |entry| {
                let name = entry.path().to_string();
                let mut body = String::new();
                entry.open()?.read_to_string(&mut body)?;
                seen.push((name, body));
                Ok(())
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("a/one.txt".to_string(), "one".to_string()),
                ("a/two.txt".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_visitor_error_stops_iteration() {
        let mut container = VecContainer {
            entries: vec![("a/1", Vec::new()), ("a/2", Vec::new()), ("a/3", Vec::new())],
        };

        let mut calls = 0;
        let result = container.for_each_entry(&mut |_entry| {
            calls += 1;
            Err(ExtractionError::InvalidConfig {
                reason: "stop".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_on_disk_entry_opens_lazily() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("payload.bin");
        std::fs::write(&file, b"payload").unwrap();

        let path = EntryPath::validate(Path::new("scope/payload.bin")).unwrap();
        let entry = ContainerEntry::on_disk(path, EntryKind::File, file.clone());
        assert_eq!(entry.origin(), file.as_path());

        let mut body = Vec::new();
        entry.open().unwrap().read_to_end(&mut body).unwrap();
        assert_eq!(body, b"payload");
    }

    #[test]
    fn test_on_disk_missing_file_is_read_error() {
        let path = EntryPath::validate(Path::new("scope/gone.bin")).unwrap();
        let entry = ContainerEntry::on_disk(path, EntryKind::File, PathBuf::from("/nonexistent/gone.bin"));
        assert!(matches!(entry.open(), Err(ExtractionError::Read { .. })));
    }
}
