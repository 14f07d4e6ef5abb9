//! Writing entry content under the destination root.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::formats::ContainerEntry;
use crate::types::DestDir;

/// Buffer size for both the copy loop and the output writer (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Which side of a copy failed.
///
/// Callers map the read side differently: a failing container stream is a
/// read error, a failing inner archive entry is a corrupt archive.
#[derive(Debug)]
pub(crate) enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Streams `reader` into a freshly truncated file at `output`.
///
/// Parent directories are created first. Returns the number of bytes
/// written.
pub(crate) fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    output: &Path,
) -> std::result::Result<u64, CopyError> {
    if let Some(parent) = output.parent() {
        create_dir_all(parent).map_err(CopyError::Write)?;
    }

    let file = File::create(output).map_err(CopyError::Write)?;
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(CopyError::Write)?;
        total = total.saturating_add(bytes_read as u64);
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total)
}

/// Writes an admitted entry to `dest/<entry path>`.
///
/// Returns the output path and the number of bytes written. An existing file
/// at that path is overwritten.
///
/// # Errors
///
/// Returns `ExtractionError::Read` if the entry stream fails and
/// `ExtractionError::Write` if the output cannot be created or written.
pub fn materialize(entry: ContainerEntry<'_>, dest: &DestDir) -> Result<(PathBuf, u64)> {
    let output = dest.join(entry.path());
    let origin = entry.origin().to_path_buf();
    let mut reader = entry.open()?;

    match write_file(&mut reader, &output) {
        Ok(bytes) => Ok((output, bytes)),
        Err(CopyError::Read(e)) => Err(ExtractionError::read(origin, e)),
        Err(CopyError::Write(e)) => Err(ExtractionError::write(output, e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use crate::types::EntryPath;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("stream truncated"))
        }
    }

    fn entry<'a>(path: &str, reader: &'a mut dyn Read) -> ContainerEntry<'a> {
        let path = EntryPath::validate(Path::new(path)).unwrap();
        let origin = PathBuf::from("export.tar.xz").join(path.as_path());
        ContainerEntry::streamed(path, EntryKind::File, origin, reader)
    }

    #[test]
    fn test_materialize_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        let mut reader = Cursor::new(b"payload".to_vec());

        let (output, bytes) =
            materialize(entry("batch/alice@org.co.uk/a.txt", &mut reader), &dest).unwrap();

        assert_eq!(bytes, 7);
        assert_eq!(output, dest.as_path().join("batch/alice@org.co.uk/a.txt"));
        assert_eq!(std::fs::read(&output).unwrap(), b"payload");
    }

    #[test]
    fn test_materialize_truncates_existing_file() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        std::fs::create_dir_all(temp.path().join("s")).unwrap();
        std::fs::write(temp.path().join("s/f.txt"), b"a much longer old body").unwrap();

        let mut reader = Cursor::new(b"new".to_vec());
        materialize(entry("s/f.txt", &mut reader), &dest).unwrap();

        assert_eq!(std::fs::read(temp.path().join("s/f.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_read_failure_names_origin() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        let mut reader = FailingReader;

        let err = materialize(entry("s/f.txt", &mut reader), &dest).unwrap_err();
        match err {
            ExtractionError::Read { path, .. } => {
                assert_eq!(path, PathBuf::from("export.tar.xz/s/f.txt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_failure_when_parent_is_file() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        std::fs::write(temp.path().join("s"), b"not a directory").unwrap();

        let mut reader = Cursor::new(b"x".to_vec());
        let err = materialize(entry("s/f.txt", &mut reader), &dest).unwrap_err();
        assert!(matches!(err, ExtractionError::Write { .. }));
    }
}
