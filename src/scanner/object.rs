//! Filesystem objects produced by a walk

use std::fmt;
use std::fs::{FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

/// Kind of a filesystem object, as seen without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (never followed)
    Symlink,
    /// Socket, fifo, device node
    Other,
}

impl ObjectKind {
    /// Classify an lstat file type
    #[must_use]
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Why an object could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// The kernel refused access
    PermissionDenied,
    /// A symlink whose target does not resolve
    BrokenSymlink,
    /// Any other I/O failure (vanished file, device error)
    IoError,
}

impl AccessReason {
    /// Classify an I/O error
    #[must_use]
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::IoError,
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PermissionDenied => "permission_denied",
            Self::BrokenSymlink => "broken_symlink",
            Self::IoError => "io_error",
        };
        f.write_str(name)
    }
}

/// Where a symlink leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Target chain ends at an existing object
    Resolved(PathBuf),
    /// Target does not exist
    Broken,
    /// Target chain loops back on itself
    Loop,
    /// Resolution crossed a directory the user cannot search
    Denied,
}

impl LinkStatus {
    /// Whether the link is dangling or looping
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        matches!(self, Self::Broken | Self::Loop)
    }
}

/// Metadata captured for a readable object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Size in bytes (link text length for symlinks)
    pub size: u64,
    /// Permission bits (`st_mode & 0o7777`)
    pub mode: u32,
    /// Owning user id
    pub uid: u32,
    /// Owning group id
    pub gid: u32,
    /// Modification time, when the platform reports one
    pub modified: Option<SystemTime>,
    /// Raw link text, for symlinks
    pub link_target: Option<PathBuf>,
    /// Resolution of the link, for symlinks
    pub link_status: Option<LinkStatus>,
}

impl ObjectMeta {
    /// Capture the fields stoker needs from lstat metadata
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let (mode, uid, gid) = ownership(metadata);
        Self {
            size: metadata.len(),
            mode,
            uid,
            gid,
            modified: metadata.modified().ok(),
            link_target: None,
            link_status: None,
        }
    }
}

#[cfg(unix)]
fn ownership(metadata: &Metadata) -> (u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (metadata.mode() & 0o7777, metadata.uid(), metadata.gid())
}

#[cfg(not(unix))]
fn ownership(metadata: &Metadata) -> (u32, u32, u32) {
    let mode = if metadata.permissions().readonly() { 0o555 } else { 0o777 };
    (mode, 0, 0)
}

/// Readable or sentinel state of an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectStatus {
    /// Metadata was read successfully
    Readable(ObjectMeta),
    /// Sentinel: the object could not be stat'ed or listed
    Unreadable {
        /// Classified cause
        reason: AccessReason,
        /// Operating system message
        message: String,
    },
}

/// One object yielded by a [`TreeWalker`](super::TreeWalker)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsObject {
    /// Path relative to the walked root; the merge key
    pub path: PathBuf,
    /// Path on disk
    pub full_path: PathBuf,
    /// Kind, if it could be determined
    pub kind: Option<ObjectKind>,
    /// Metadata or error reason
    pub status: ObjectStatus,
}

impl FsObject {
    /// Build a readable object
    #[must_use]
    pub fn readable(path: PathBuf, full_path: PathBuf, kind: ObjectKind, meta: ObjectMeta) -> Self {
        Self {
            path,
            full_path,
            kind: Some(kind),
            status: ObjectStatus::Readable(meta),
        }
    }

    /// Build a sentinel entry from the error that made the object unreadable
    #[must_use]
    pub fn unreadable(
        path: PathBuf,
        full_path: PathBuf,
        kind: Option<ObjectKind>,
        err: &io::Error,
    ) -> Self {
        Self {
            path,
            full_path,
            kind,
            status: ObjectStatus::Unreadable {
                reason: AccessReason::from_io(err),
                message: err.to_string(),
            },
        }
    }

    /// Relative path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata, unless this is a sentinel
    #[must_use]
    pub const fn meta(&self) -> Option<&ObjectMeta> {
        match &self.status {
            ObjectStatus::Readable(meta) => Some(meta),
            ObjectStatus::Unreadable { .. } => None,
        }
    }

    /// Whether this is a sentinel entry
    #[must_use]
    pub const fn is_unreadable(&self) -> bool {
        matches!(self.status, ObjectStatus::Unreadable { .. })
    }

    /// Sentinel reason, if any
    #[must_use]
    pub const fn unreadable_reason(&self) -> Option<AccessReason> {
        match &self.status {
            ObjectStatus::Unreadable { reason, .. } => Some(*reason),
            ObjectStatus::Readable(_) => None,
        }
    }

    /// Whether this object is a directory (readable or not)
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == Some(ObjectKind::Directory)
    }
}
