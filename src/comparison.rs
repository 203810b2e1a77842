//! Merge-join comparison of two directory walks
//!
//! Every relative path seen in either tree gets exactly one
//! [`ComparisonResult`]. Results come out lazily, in walk order, so the output
//! for an unchanged pair of trees is identical from run to run.
//!
//! For a path present on both sides the rules apply in order:
//! 1. either side unreadable: [`Classification::Inaccessible`]
//! 2. kinds differ: [`Classification::TypeMismatch`]
//! 3. directories: [`Classification::Match`]
//! 4. symlinks: raw targets equal or [`Classification::ContentMismatch`]
//! 5. files: sizes, then contents
//!
//! Paths below a directory that one side could not list are
//! [`Classification::Unknown`], never reported as missing.

mod content;
mod hash;
mod merge;


use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, warn};

pub use content::{ContentComparator, ContentError};
pub use hash::{FileHash, FileHasher};
pub use merge::{Joined, MergeJoin};

use crate::config::{Config, DEFAULT_CHECKSUM_THRESHOLD};
use crate::scanner::{AccessReason, FsObject, ObjectKind, ObjectStatus, TreeWalker, Walk};

/// Which tree an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// First tree given to the comparison
    Left,
    /// Second tree given to the comparison
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Outcome for one relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Present on both sides and equal
    Match,
    /// Only present in the left tree
    MissingInRight,
    /// Only present in the right tree
    MissingInLeft,
    /// Different kinds of object
    TypeMismatch,
    /// Same kind, different size, content or link target
    ContentMismatch,
    /// Equal content but different modification time (opt-in)
    TimeMismatch,
    /// One side could not be read
    Inaccessible,
    /// Below a directory the other side could not list
    Unknown,
}

impl Classification {
    /// Every classification, in report order
    pub const ALL: [Self; 8] = [
        Self::MissingInRight,
        Self::MissingInLeft,
        Self::TypeMismatch,
        Self::ContentMismatch,
        Self::TimeMismatch,
        Self::Inaccessible,
        Self::Unknown,
        Self::Match,
    ];

    /// Whether this outcome counts as a difference
    #[must_use]
    pub const fn is_difference(self) -> bool {
        !matches!(self, Self::Match)
    }

    /// Name used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::MissingInRight => "missing_in_right",
            Self::MissingInLeft => "missing_in_left",
            Self::TypeMismatch => "type_mismatch",
            Self::ContentMismatch => "content_mismatch",
            Self::TimeMismatch => "time_mismatch",
            Self::Inaccessible => "inaccessible",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supporting evidence for a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Detail {
    /// Kinds on each side
    Kinds {
        /// Left kind
        left: ObjectKind,
        /// Right kind
        right: ObjectKind,
    },
    /// File sizes on each side
    Sizes {
        /// Left size in bytes
        left: u64,
        /// Right size in bytes
        right: u64,
    },
    /// Sizes match but bytes differ
    Contents,
    /// Raw symlink targets on each side
    Targets {
        /// Left link text
        left: PathBuf,
        /// Right link text
        right: PathBuf,
    },
    /// Modification times on each side
    Times {
        /// Left mtime
        left: Option<SystemTime>,
        /// Right mtime
        right: Option<SystemTime>,
    },
    /// Why one side could not be read
    Unreadable {
        /// The side that failed
        side: Side,
        /// Classified cause
        reason: AccessReason,
        /// Operating system message
        message: String,
    },
    /// Directory on the other side that could not be listed
    Shadowed {
        /// The unlistable directory
        under: PathBuf,
        /// The side it is on
        side: Side,
    },
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kinds { left, right } => write!(f, "{left} vs {right}"),
            Self::Sizes { left, right } => write!(f, "{left} bytes vs {right} bytes"),
            Self::Contents => f.write_str("contents differ"),
            Self::Targets { left, right } => {
                write!(f, "-> {} vs -> {}", left.display(), right.display())
            }
            Self::Times { left, right } => {
                write!(f, "mtime {} vs {}", epoch_secs(*left), epoch_secs(*right))
            }
            Self::Unreadable {
                side,
                reason,
                message,
            } => write!(f, "{side}: {reason} ({message})"),
            Self::Shadowed { under, side } => {
                write!(f, "{side} directory {} unreadable", under.display())
            }
        }
    }
}

fn epoch_secs(time: Option<SystemTime>) -> String {
    time.and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map_or_else(|| "?".to_string(), |d| d.as_secs().to_string())
}

/// One line of a comparison report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    /// Relative path shared by both trees
    pub path: PathBuf,
    /// Outcome
    pub classification: Classification,
    /// Evidence, when there is any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Detail>,
}

impl ComparisonResult {
    fn new(path: PathBuf, classification: Classification, detail: Option<Detail>) -> Self {
        Self {
            path,
            classification,
            detail,
        }
    }
}

/// Knobs for a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Files larger than this are compared by SHA-256 digest
    pub checksum_threshold: u64,
    /// Report equal files whose modification times differ
    pub compare_times: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            checksum_threshold: DEFAULT_CHECKSUM_THRESHOLD,
            compare_times: false,
        }
    }
}

impl From<&Config> for CompareOptions {
    fn from(config: &Config) -> Self {
        Self {
            checksum_threshold: config.checksum_threshold(),
            compare_times: config.compare_times,
        }
    }
}

/// Lazy comparison of two sorted object streams
pub struct Comparison<L: Iterator<Item = FsObject>, R: Iterator<Item = FsObject>> {
    join: MergeJoin<L, R>,
    options: CompareOptions,
    content: ContentComparator,
    /// Unlistable directory on the left; right-only paths below it are unknown
    shadow_left: Option<PathBuf>,
    /// Unlistable directory on the right; left-only paths below it are unknown
    shadow_right: Option<PathBuf>,
}

impl<'a> Comparison<Walk<'a>, Walk<'a>> {
    /// Compare two walked trees
    #[must_use]
    pub fn trees(left: &'a TreeWalker, right: &'a TreeWalker, options: CompareOptions) -> Self {
        debug!(
            left = %left.root().display(),
            right = %right.root().display(),
            "comparing trees"
        );
        Self::new(left.walk(), right.walk(), options)
    }
}

impl Comparison<std::vec::IntoIter<FsObject>, std::vec::IntoIter<FsObject>> {
    /// Compare streams in arbitrary order by sorting both in memory first
    pub fn from_unsorted(
        left: impl IntoIterator<Item = FsObject>,
        right: impl IntoIterator<Item = FsObject>,
        options: CompareOptions,
    ) -> Self {
        let mut left: Vec<_> = left.into_iter().collect();
        let mut right: Vec<_> = right.into_iter().collect();
        left.sort_by(|a, b| a.path.cmp(&b.path));
        right.sort_by(|a, b| a.path.cmp(&b.path));
        Self::new(left.into_iter(), right.into_iter(), options)
    }
}

impl<L, R> Comparison<L, R>
where
    L: Iterator<Item = FsObject>,
    R: Iterator<Item = FsObject>,
{
    /// Compare two streams already sorted by relative path
    pub fn new(left: L, right: R, options: CompareOptions) -> Self {
        Self {
            join: MergeJoin::new(left, right),
            options,
            content: ContentComparator::new(options.checksum_threshold),
            shadow_left: None,
            shadow_right: None,
        }
    }

    fn note_shadow(&mut self, side: Side, obj: &FsObject) {
        if obj.is_unreadable() && obj.kind != Some(ObjectKind::File) {
            let slot = match side {
                Side::Left => &mut self.shadow_left,
                Side::Right => &mut self.shadow_right,
            };
            *slot = Some(obj.path.clone());
        }
    }

    fn one_sided(&mut self, side: Side, obj: FsObject) -> ComparisonResult {
        let shadow = match side {
            Side::Left => &self.shadow_right,
            Side::Right => &self.shadow_left,
        };
        let shadowed_by = shadow
            .as_ref()
            .filter(|dir| is_below(&obj.path, dir))
            .cloned();

        self.note_shadow(side, &obj);

        if let Some(under) = shadowed_by {
            let other = match side {
                Side::Left => Side::Right,
                Side::Right => Side::Left,
            };
            return ComparisonResult::new(
                obj.path,
                Classification::Unknown,
                Some(Detail::Shadowed { under, side: other }),
            );
        }

        let classification = match side {
            Side::Left => Classification::MissingInRight,
            Side::Right => Classification::MissingInLeft,
        };
        ComparisonResult::new(obj.path, classification, None)
    }

    fn both(&mut self, left: FsObject, right: FsObject) -> ComparisonResult {
        self.note_shadow(Side::Left, &left);
        self.note_shadow(Side::Right, &right);

        let (classification, detail) = self.classify(&left, &right);
        ComparisonResult::new(left.path, classification, detail)
    }

    fn classify(&self, left: &FsObject, right: &FsObject) -> (Classification, Option<Detail>) {
        let (lmeta, rmeta) = match (&left.status, &right.status) {
            (ObjectStatus::Unreadable { reason, message }, _) => {
                return unreadable(Side::Left, *reason, message.clone());
            }
            (_, ObjectStatus::Unreadable { reason, message }) => {
                return unreadable(Side::Right, *reason, message.clone());
            }
            (ObjectStatus::Readable(l), ObjectStatus::Readable(r)) => (l, r),
        };

        let (Some(lkind), Some(rkind)) = (left.kind, right.kind) else {
            return (Classification::Unknown, None);
        };

        if lkind != rkind {
            return (
                Classification::TypeMismatch,
                Some(Detail::Kinds {
                    left: lkind,
                    right: rkind,
                }),
            );
        }

        let outcome = match lkind {
            ObjectKind::Directory | ObjectKind::Other => (Classification::Match, None),
            ObjectKind::Symlink => {
                if lmeta.link_target == rmeta.link_target {
                    (Classification::Match, None)
                } else {
                    (
                        Classification::ContentMismatch,
                        Some(Detail::Targets {
                            left: lmeta.link_target.clone().unwrap_or_default(),
                            right: rmeta.link_target.clone().unwrap_or_default(),
                        }),
                    )
                }
            }
            ObjectKind::File => {
                if lmeta.size != rmeta.size {
                    return (
                        Classification::ContentMismatch,
                        Some(Detail::Sizes {
                            left: lmeta.size,
                            right: rmeta.size,
                        }),
                    );
                }
                match self
                    .content
                    .equal(&left.full_path, &right.full_path, lmeta.size)
                {
                    Ok(true) => (Classification::Match, None),
                    Ok(false) => (Classification::ContentMismatch, Some(Detail::Contents)),
                    Err(ContentError { side, error }) => {
                        warn!(path = %left.path.display(), %side, %error, "cannot read contents");
                        return unreadable(side, AccessReason::from_io(&error), error.to_string());
                    }
                }
            }
        };

        let checks_time = matches!(lkind, ObjectKind::File | ObjectKind::Symlink);
        if outcome.0 == Classification::Match
            && self.options.compare_times
            && checks_time
            && lmeta.modified != rmeta.modified
        {
            return (
                Classification::TimeMismatch,
                Some(Detail::Times {
                    left: lmeta.modified,
                    right: rmeta.modified,
                }),
            );
        }

        outcome
    }
}

fn unreadable(side: Side, reason: AccessReason, message: String) -> (Classification, Option<Detail>) {
    (
        Classification::Inaccessible,
        Some(Detail::Unreadable {
            side,
            reason,
            message,
        }),
    )
}

fn is_below(path: &Path, dir: &Path) -> bool {
    path != dir && path.starts_with(dir)
}

impl<L, R> Iterator for Comparison<L, R>
where
    L: Iterator<Item = FsObject>,
    R: Iterator<Item = FsObject>,
{
    type Item = ComparisonResult;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.join.next()? {
            Joined::Left(obj) => self.one_sided(Side::Left, obj),
            Joined::Right(obj) => self.one_sided(Side::Right, obj),
            Joined::Both(l, r) => self.both(l, r),
        };
        debug!(path = %result.path.display(), classification = %result.classification, "classified");
        Some(result)
    }
}

/// Per-classification counts for a finished comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    /// Paths examined
    pub total: usize,
    /// Paths that matched
    pub matched: usize,
    /// Paths only in the left tree
    pub missing_in_right: usize,
    /// Paths only in the right tree
    pub missing_in_left: usize,
    /// Kind differences
    pub type_mismatch: usize,
    /// Size, content or link target differences
    pub content_mismatch: usize,
    /// Modification time differences
    pub time_mismatch: usize,
    /// Paths that could not be read
    pub inaccessible: usize,
    /// Paths below an unlistable directory
    pub unknown: usize,
}

impl ComparisonSummary {
    /// Count one result
    pub fn record(&mut self, result: &ComparisonResult) {
        self.total += 1;
        let slot = match result.classification {
            Classification::Match => &mut self.matched,
            Classification::MissingInRight => &mut self.missing_in_right,
            Classification::MissingInLeft => &mut self.missing_in_left,
            Classification::TypeMismatch => &mut self.type_mismatch,
            Classification::ContentMismatch => &mut self.content_mismatch,
            Classification::TimeMismatch => &mut self.time_mismatch,
            Classification::Inaccessible => &mut self.inaccessible,
            Classification::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    /// Count for one classification
    #[must_use]
    pub const fn count(&self, classification: Classification) -> usize {
        match classification {
            Classification::Match => self.matched,
            Classification::MissingInRight => self.missing_in_right,
            Classification::MissingInLeft => self.missing_in_left,
            Classification::TypeMismatch => self.type_mismatch,
            Classification::ContentMismatch => self.content_mismatch,
            Classification::TimeMismatch => self.time_mismatch,
            Classification::Inaccessible => self.inaccessible,
            Classification::Unknown => self.unknown,
        }
    }

    /// Number of results that were not matches
    #[must_use]
    pub const fn differences(&self) -> usize {
        self.total - self.matched
    }

    /// Check if the trees are identical
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.differences() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_names() {
        assert_eq!(Classification::MissingInRight.to_string(), "missing_in_right");
        assert_eq!(
            serde_json::to_string(&Classification::ContentMismatch).unwrap(),
            r#""content_mismatch""#
        );
    }

    #[test]
    fn test_only_match_is_not_difference() {
        for c in Classification::ALL {
            assert_eq!(c.is_difference(), c != Classification::Match);
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ComparisonSummary::default();
        for c in [
            Classification::Match,
            Classification::Match,
            Classification::MissingInLeft,
        ] {
            summary.record(&ComparisonResult::new(PathBuf::from("p"), c, None));
        }

        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(Classification::Match), 2);
        assert_eq!(summary.differences(), 1);
        assert!(!summary.is_identical());
    }

    #[test]
    fn test_is_below() {
        assert!(is_below(Path::new("a/b"), Path::new("a")));
        assert!(!is_below(Path::new("a"), Path::new("a")));
        assert!(!is_below(Path::new("ab"), Path::new("a")));
    }

    #[test]
    fn test_detail_display() {
        let detail = Detail::Sizes { left: 2, right: 3 };
        assert_eq!(detail.to_string(), "2 bytes vs 3 bytes");
    }
}
