//! Validated relative path of a container or archive entry.

use crate::ExtractionError;
use crate::Result;
use std::fmt;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A relative entry path made only of normal segments.
///
/// `EntryPath` can only be built through [`EntryPath::validate`], which
/// rejects absolute paths, `..` segments and NUL bytes, and drops `.`
/// segments. Joining it onto a destination directory therefore never leaves
/// that directory.
///
/// # Examples
///
/// ```
/// use scopex_core::EntryPath;
/// use std::path::Path;
///
/// let path = EntryPath::validate(Path::new("20241010/alice@org.co.uk/takeout-001.zip"))?;
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.segment(2), Some("alice@org.co.uk"));
/// assert_eq!(path.file_name(), Some("takeout-001.zip"));
///
/// assert!(EntryPath::validate(Path::new("../bob@org.co.uk/mail.mbox")).is_err());
/// # Ok::<(), scopex_core::ExtractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath(PathBuf);

impl EntryPath {
    /// Validates `path` and normalizes away `.` segments.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathTraversal` if the path is absolute,
    /// carries a root or prefix, contains `..`, or contains a NUL byte.
    pub fn validate(path: &Path) -> Result<Self> {
        if path.as_os_str().as_encoded_bytes().contains(&0) {
            return Err(ExtractionError::PathTraversal {
                path: path.to_path_buf(),
            });
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(segment) => normalized.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ExtractionError::PathTraversal {
                        path: path.to_path_buf(),
                    });
                }
            }
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.components().count()
    }

    /// Returns `true` if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Returns the segment at 1-based `position`.
    ///
    /// Returns `None` when the path is shorter or the segment is not valid
    /// UTF-8.
    #[must_use]
    pub fn segment(&self, position: usize) -> Option<&str> {
        let index = position.checked_sub(1)?;
        self.0
            .components()
            .nth(index)
            .and_then(|component| component.as_os_str().to_str())
    }

    /// Returns the last segment as UTF-8, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
