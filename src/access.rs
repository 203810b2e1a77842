//! Accessibility audit of a walked tree
//!
//! The report is sparse: only objects the invoking user cannot use are
//! listed. A directory that cannot be listed or entered is reported once as
//! [`IssueReason::SubtreeInaccessible`] and nothing beneath it is reported.

mod identity;
mod permissions;

#[cfg(test)]
mod integration_tests;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

pub use identity::{group_name, user_name, Identity, NameCache};
pub use permissions::{can_read, can_traverse, mode_string, PermissionClass};

use crate::scanner::{AccessReason, FsObject, LinkStatus, ObjectKind, ObjectStatus};

/// Why an object is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueReason {
    /// Read permission is missing
    PermissionDenied,
    /// A symlink whose target does not resolve
    BrokenSymlink,
    /// The object could not be inspected
    IoError,
    /// A directory that cannot be listed or entered
    SubtreeInaccessible,
}

impl IssueReason {
    /// Name used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::BrokenSymlink => "broken_symlink",
            Self::IoError => "io_error",
            Self::SubtreeInaccessible => "subtree_inaccessible",
        }
    }
}

impl From<AccessReason> for IssueReason {
    fn from(reason: AccessReason) -> Self {
        match reason {
            AccessReason::PermissionDenied => Self::PermissionDenied,
            AccessReason::BrokenSymlink => Self::BrokenSymlink,
            AccessReason::IoError => Self::IoError,
        }
    }
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inaccessible object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessIssue {
    /// Path relative to the audited root
    pub path: PathBuf,
    /// Why it is reported
    pub reason: IssueReason,
    /// Object kind, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
    /// `rwxr-x---` style permissions, when metadata was readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    /// Owner name (or uid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Group name (or gid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Operating system message for objects that could not be read at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Evaluates objects against one user's permissions
#[derive(Debug, Clone)]
pub struct AccessChecker {
    identity: Identity,
}

impl AccessChecker {
    /// Checker for an explicit identity
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Checker for the user running this process
    #[must_use]
    pub fn for_current_user() -> Self {
        Self::new(Identity::current())
    }

    /// Decide whether one object is a problem
    #[must_use]
    pub fn check(&self, obj: &FsObject) -> Option<IssueReason> {
        let meta = match &obj.status {
            ObjectStatus::Unreadable { reason, .. } => {
                return Some(match obj.kind {
                    Some(ObjectKind::Directory) => IssueReason::SubtreeInaccessible,
                    None if *reason == AccessReason::PermissionDenied => {
                        IssueReason::SubtreeInaccessible
                    }
                    _ => IssueReason::from(*reason),
                });
            }
            ObjectStatus::Readable(meta) => meta,
        };

        match obj.kind? {
            ObjectKind::File | ObjectKind::Other => {
                (!can_read(&self.identity, meta)).then_some(IssueReason::PermissionDenied)
            }
            ObjectKind::Directory => (!can_traverse(&self.identity, meta))
                .then_some(IssueReason::SubtreeInaccessible),
            ObjectKind::Symlink => match meta.link_status {
                Some(LinkStatus::Broken | LinkStatus::Loop) => Some(IssueReason::BrokenSymlink),
                Some(LinkStatus::Denied) => Some(IssueReason::PermissionDenied),
                Some(LinkStatus::Resolved(_)) | None => None,
            },
        }
    }

    /// Audit a stream of objects in walk order
    pub fn audit<I>(&self, objects: I) -> Audit<'_, I::IntoIter>
    where
        I: IntoIterator<Item = FsObject>,
    {
        Audit {
            checker: self,
            inner: objects.into_iter(),
            suppressed: None,
            names: NameCache::new(),
        }
    }
}

/// Lazy stream of [`AccessIssue`]s
pub struct Audit<'a, I> {
    checker: &'a AccessChecker,
    inner: I,
    /// Directory already reported as a whole
    suppressed: Option<PathBuf>,
    names: NameCache,
}

impl<I> Audit<'_, I> {
    fn issue(&mut self, obj: FsObject, reason: IssueReason) -> AccessIssue {
        let (permissions, owner, group, message) = match &obj.status {
            ObjectStatus::Readable(meta) => (
                Some(mode_string(meta.mode)),
                Some(self.names.user(meta.uid).to_string()),
                Some(self.names.group(meta.gid).to_string()),
                None,
            ),
            ObjectStatus::Unreadable { message, .. } => (None, None, None, Some(message.clone())),
        };

        AccessIssue {
            path: obj.path,
            reason,
            kind: obj.kind,
            permissions,
            owner,
            group,
            message,
        }
    }
}

impl<I> Iterator for Audit<'_, I>
where
    I: Iterator<Item = FsObject>,
{
    type Item = AccessIssue;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let obj = self.inner.next()?;

            if let Some(dir) = &self.suppressed {
                if obj.path.starts_with(dir) {
                    continue;
                }
                self.suppressed = None;
            }

            let Some(reason) = self.checker.check(&obj) else {
                continue;
            };

            debug!(path = %obj.path.display(), %reason, "access issue");
            if reason == IssueReason::SubtreeInaccessible {
                self.suppressed = Some(obj.path.clone());
            }
            return Some(self.issue(obj, reason));
        }
    }
}

/// Per-reason counts for a finished audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    /// Issues reported
    pub total: usize,
    /// Unreadable objects
    pub permission_denied: usize,
    /// Dangling or looping symlinks
    pub broken_symlink: usize,
    /// Objects that could not be inspected
    pub io_error: usize,
    /// Directories that cannot be listed or entered
    pub subtree_inaccessible: usize,
}

impl AuditSummary {
    /// Count one issue
    pub fn record(&mut self, issue: &AccessIssue) {
        self.total += 1;
        match issue.reason {
            IssueReason::PermissionDenied => self.permission_denied += 1,
            IssueReason::BrokenSymlink => self.broken_symlink += 1,
            IssueReason::IoError => self.io_error += 1,
            IssueReason::SubtreeInaccessible => self.subtree_inaccessible += 1,
        }
    }
}
