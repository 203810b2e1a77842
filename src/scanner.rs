//! Lazy, fault-tolerant tree walking
//!
//! [`TreeWalker`] enumerates everything under a root in lexicographic
//! depth-first order. Siblings are visited sorted by file name, which makes
//! the yielded order identical to the component-wise ordering of the relative
//! paths. That ordering is what the comparison merge relies on.
//!
//! Nothing that goes wrong below the root stops the walk. An object that
//! cannot be stat'ed, or a directory that cannot be listed, is yielded once
//! as a sentinel carrying the reason, and the walk carries on with its
//! siblings.

mod object;
mod symlinks;


use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

pub use object::{AccessReason, FsObject, LinkStatus, ObjectKind, ObjectMeta, ObjectStatus};

use crate::config::PatternMatcher;
use crate::error::{Result, StokerError};

/// Walks one directory tree
///
/// Each call to [`walk`](Self::walk) starts a fresh traversal, so the same
/// walker can be consumed any number of times.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    matcher: PatternMatcher,
}

impl TreeWalker {
    /// Create a walker after checking the root
    ///
    /// # Errors
    ///
    /// Returns [`StokerError::PathNotFound`] if the root does not exist,
    /// [`StokerError::NotADirectory`] if it is not a directory, and
    /// [`StokerError::RootInaccessible`] if it cannot be listed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StokerError::PathNotFound(root.to_path_buf()),
            _ => StokerError::RootInaccessible {
                path: root.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(StokerError::NotADirectory(root.to_path_buf()));
        }

        fs::read_dir(root).map_err(|e| StokerError::RootInaccessible {
            path: root.to_path_buf(),
            source: e,
        })?;

        let root = dunce::canonicalize(root).map_err(|e| StokerError::RootInaccessible {
            path: root.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            root,
            matcher: PatternMatcher::new(),
        })
    }

    /// Skip objects matching the given ignore patterns
    #[must_use]
    pub fn with_matcher(mut self, matcher: PatternMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Canonical root of the walk
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new traversal
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        debug!(root = %self.root.display(), "starting walk");
        let inner = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Walk {
            root: &self.root,
            matcher: &self.matcher,
            inner,
            pending: None,
        }
    }
}

impl<'a> IntoIterator for &'a TreeWalker {
    type Item = FsObject;
    type IntoIter = Walk<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.walk()
    }
}

/// Iterator over the objects of one traversal
///
/// walkdir reports a directory that cannot be listed as a normal entry
/// followed by an error for the same path. `Walk` keeps one item of
/// lookahead so the pair collapses into a single sentinel.
pub struct Walk<'a> {
    root: &'a Path,
    matcher: &'a PatternMatcher,
    inner: walkdir::IntoIter,
    pending: Option<walkdir::Result<walkdir::DirEntry>>,
}

impl Walk<'_> {
    fn pull(&mut self) -> Option<walkdir::Result<walkdir::DirEntry>> {
        self.pending.take().or_else(|| self.inner.next())
    }

    fn relative(&self, full: &Path) -> PathBuf {
        full.strip_prefix(self.root)
            .map_or_else(|_| full.to_path_buf(), Path::to_path_buf)
    }

    fn visit(&mut self, entry: &walkdir::DirEntry) -> FsObject {
        let full_path = entry.path().to_path_buf();
        let path = self.relative(&full_path);
        let kind = ObjectKind::from_file_type(entry.file_type());

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                // walkdir still tries to list a directory it could not stat
                if kind == ObjectKind::Directory {
                    let _ = self.take_listing_error(&full_path);
                }
                let err = io::Error::from(e);
                warn!(path = %path.display(), error = %err, "cannot stat");
                return FsObject::unreadable(path, full_path, Some(kind), &err);
            }
        };

        let mut meta = ObjectMeta::from_metadata(&metadata);

        match kind {
            ObjectKind::Directory => {
                if let Some(err) = self.take_listing_error(&full_path) {
                    let err = io::Error::from(err);
                    warn!(path = %path.display(), error = %err, "cannot list directory");
                    return FsObject::unreadable(path, full_path, Some(kind), &err);
                }
                debug!(path = %path.display(), "entering directory");
            }
            ObjectKind::Symlink => match symlinks::inspect(&full_path) {
                Ok((target, status)) => {
                    if status.is_broken() {
                        debug!(path = %path.display(), target = %target.display(), "broken symlink");
                    }
                    meta.link_target = Some(target);
                    meta.link_status = Some(status);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot read symlink");
                    return FsObject::unreadable(path, full_path, Some(kind), &err);
                }
            },
            ObjectKind::File | ObjectKind::Other => {}
        }

        FsObject::readable(path, full_path, kind, meta)
    }

    /// Pull the next item and consume it if it is the listing error for `dir`
    fn take_listing_error(&mut self, dir: &Path) -> Option<walkdir::Error> {
        match self.inner.next()? {
            Err(err) if err.path() == Some(dir) && err.io_error().is_some() => Some(err),
            next => {
                self.pending = Some(next);
                None
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = FsObject;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.pull()? {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_dir();
                    let rel = self.relative(entry.path());
                    if !self.matcher.should_include(&rel, is_dir) {
                        debug!(path = %rel.display(), "ignored");
                        if is_dir {
                            self.inner.skip_current_dir();
                        }
                        continue;
                    }
                    return Some(self.visit(&entry));
                }
                Err(err) => {
                    let full_path = err
                        .path()
                        .map_or_else(|| self.root.to_path_buf(), Path::to_path_buf);
                    let path = self.relative(&full_path);
                    let err = io::Error::from(err);
                    warn!(path = %path.display(), error = %err, "unreadable entry");
                    return Some(FsObject::unreadable(path, full_path, None, &err));
                }
            }
        }
    }
}
