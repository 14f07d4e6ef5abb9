//! Exploded export tree on the local filesystem.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::EntryPath;

use super::traits::Container;
use super::traits::ContainerEntry;
use super::traits::EntryVisitor;

/// A directory whose top-level children are scope directories.
///
/// Each scope directory is listed one level deep; subdirectories are yielded
/// as `Directory` entries but never descended. Children are sorted by file
/// name, and file contents are only opened when an entry is opened.
#[derive(Debug)]
pub struct DirectoryContainer {
    root: PathBuf,
    scope: Option<String>,
}

impl DirectoryContainer {
    /// Opens a directory container over every scope under `root`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::ContainerFormat` if `root` is not a
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ExtractionError::ContainerFormat {
                path: root,
                reason: "not a directory".to_string(),
            });
        }
        Ok(Self { root, scope: None })
    }

    /// Opens a container restricted to the single scope directory
    /// `root/scope`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::ContainerFormat` if `root/scope` is not a
    /// directory.
    pub fn scoped(root: impl Into<PathBuf>, scope: impl Into<String>) -> Result<Self> {
        let root = root.into();
        let scope = scope.into();
        let scope_dir = root.join(&scope);
        if !scope_dir.is_dir() {
            return Err(ExtractionError::ContainerFormat {
                path: scope_dir,
                reason: "scope is not a directory".to_string(),
            });
        }
        Ok(Self {
            root,
            scope: Some(scope),
        })
    }

    /// Returns the container root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the names of the top-level scope directories, sorted.
    ///
    /// Names that are not valid UTF-8 cannot match any rule and are left out.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Read` if the root cannot be listed.
    pub fn scope_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for child in children(&self.root) {
            let child = child.map_err(|e| walk_error(&self.root, e))?;
            if !child.file_type().is_dir() {
                continue;
            }
            if let Some(name) = child.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn visit_scope_dir(&self, scope_dir: &Path, visit: &mut EntryVisitor<'_>) -> Result<()> {
        for child in children(scope_dir) {
            let child = child.map_err(|e| walk_error(scope_dir, e))?;
            let kind = EntryKind::from_file_type(child.file_type());
            let path = self.relative(child.path())?;
            visit(ContainerEntry::on_disk(path, kind, child.into_path()))?;
        }
        Ok(())
    }

    fn relative(&self, path: &Path) -> Result<EntryPath> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| ExtractionError::PathTraversal {
                path: path.to_path_buf(),
            })?;
        EntryPath::validate(relative)
    }
}

impl Container for DirectoryContainer {
    fn format_name(&self) -> &str {
        "directory"
    }

    fn source_path(&self) -> &Path {
        &self.root
    }

    fn default_scope_depth(&self) -> usize {
        1
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        if let Some(scope) = &self.scope {
            let scope_dir = self.root.join(scope);
            debug!(scope = %scope, "listing scope directory");
            return self.visit_scope_dir(&scope_dir, visit);
        }

        for top in children(&self.root) {
            let top = top.map_err(|e| walk_error(&self.root, e))?;
            let file_type = top.file_type();

            if file_type.is_dir() {
                self.visit_scope_dir(top.path(), visit)?;
            } else {
                let path = self.relative(top.path())?;
                let kind = EntryKind::from_file_type(file_type);
                visit(ContainerEntry::on_disk(path, kind, top.into_path()))?;
            }
        }

        Ok(())
    }
}

fn children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
}

fn walk_error(dir: &Path, err: walkdir::Error) -> ExtractionError {
    let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
    ExtractionError::read(path, err.into())
}
