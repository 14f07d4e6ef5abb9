//! Validated destination root for an extraction run.

use crate::ExtractionError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

use super::EntryPath;

/// The destination root of an extraction run.
///
/// Once constructed, a `DestDir` is an existing, writable directory stored as
/// an absolute canonical path. The orchestrator owns everything written under
/// it for the duration of a run.
///
/// # Examples
///
/// ```no_run
/// use scopex_core::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/srv/exports/extracted")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates `path` as a destination root.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Io` if the path does not exist, is not a
    /// directory, cannot be canonicalized, or is not writable (Unix).
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let metadata = std::fs::metadata(&path).map_err(|e| {
            ExtractionError::Io(std::io::Error::new(
                e.kind(),
                format!("destination directory {} is not accessible: {e}", path.display()),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(ExtractionError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("destination is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ExtractionError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        #[cfg(unix)]
        check_writable(&canonical)?;

        Ok(Self(canonical))
    }

    /// Creates the directory (and its parents) if missing, then validates it.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Write` if the directory cannot be created,
    /// or any error from [`DestDir::new`].
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|e| ExtractionError::write(&path, e))?;
        Self::new(path)
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Mirrors an entry path under this destination root.
    #[inline]
    #[must_use]
    pub fn join(&self, entry: &EntryPath) -> PathBuf {
        self.0.join(entry.as_path())
    }
}

#[cfg(unix)]
fn check_writable(path: &Path) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path contains null byte",
        ))
    })?;

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the
    // call, and access() does not retain the pointer.
    #[allow(unsafe_code)]
    let result = unsafe { libc::access(c_path.as_ptr(), libc::W_OK) };

    if result != 0 {
        return Err(ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("directory is not writable: {}", path.display()),
        )));
    }
    Ok(())
}
