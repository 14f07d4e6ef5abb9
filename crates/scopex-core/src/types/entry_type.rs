//! Container entry kinds.

/// Kind of an entry yielded by a container.
///
/// Only regular files are ever extracted. Directories and other entries
/// (symlinks, hardlinks, devices) are skipped by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with readable content.
    File,

    /// Directory.
    Directory,

    /// Anything that is neither a regular file nor a directory.
    Other,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Maps a tar header entry type onto an `EntryKind`.
    ///
    /// GNU sparse and continuous files hold regular file data and are
    /// treated as files.
    #[must_use]
    pub fn from_tar(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular
            | tar::EntryType::Continuous
            | tar::EntryType::GNUSparse => Self::File,
            tar::EntryType::Directory => Self::Directory,
            _ => Self::Other,
        }
    }

    /// Maps filesystem metadata onto an `EntryKind`.
    #[must_use]
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}
