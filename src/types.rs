/*!
 * Core types and data structures for clipcat
 */

use std::io;
use std::path::{Path, PathBuf};

use strum::{Display, EnumIter};

/// Kind of a selected filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or something that should be treated as one)
    File,
    /// Directory whose descendants are expanded
    Directory,
}

/// A single user-selected path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    path: PathBuf,
    kind: EntryKind,
}

impl PathEntry {
    /// Create an entry with an explicit kind
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a file entry
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::File)
    }

    /// Create a directory entry
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::Directory)
    }

    /// Create an entry by looking at the filesystem.
    ///
    /// Anything that is not a directory, including paths that do not exist,
    /// becomes a file entry so that the classifier can report it.
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if path.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self { path, kind }
    }

    /// Path of the entry
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind of the entry
    pub fn kind(&self) -> EntryKind {
        self.kind
    }
}

/// Why a file did not make it into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SkipReason {
    /// The path does not exist
    #[strum(to_string = "not found")]
    NotFound,
    /// Permission denied while accessing the path
    #[strum(to_string = "access denied")]
    AccessDenied,
    /// Larger than the configured ceiling
    #[strum(to_string = "too large")]
    TooLarge,
    /// Content sniffing says binary
    #[strum(to_string = "binary")]
    Binary,
    /// Any other I/O failure
    #[strum(to_string = "unreadable")]
    ReadError,
    /// Directory symlink pointing back at one of its ancestors
    #[strum(to_string = "symlink loop")]
    SymlinkLoop,
}

impl SkipReason {
    /// Map an I/O error onto a skip reason
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            _ => Self::ReadError,
        }
    }
}

/// A path that was dropped, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Path as it was seen by the stage that dropped it
    pub path: PathBuf,
    /// Reason for dropping it
    pub reason: SkipReason,
    /// Optional detail, usually the underlying error message
    pub detail: Option<String>,
}

impl Skipped {
    /// Create a skip record without detail
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
            detail: None,
        }
    }

    /// Attach a detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// An eligible file, created by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the workspace root, with `/` separators
    pub relative_path: String,
    /// Size in bytes at classification time
    pub size: u64,
    /// Result of content sniffing
    pub is_binary: bool,
    /// File content, present only after a successful read
    pub content: Option<String>,
}

/// One file rendered by the formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    /// Path shown in the markers
    pub relative_path: String,
    /// Rendered block including both markers
    pub text: String,
    /// Number of lines in the file content
    pub lines: usize,
    /// Number of characters in the file content
    pub chars: usize,
}

impl FormattedBlock {
    /// Rough LLM token estimate for the block content
    pub fn estimated_tokens(&self) -> usize {
        self.chars / 4
    }
}
