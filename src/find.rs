//! Searching a walk by type extension and owner

use std::path::Path;

use tracing::debug;

use crate::access::NameCache;
use crate::scanner::FsObject;

/// Suffixes treated as a compression wrapper around the real format
const COMPRESSED: [&str; 2] = ["gz", "bz2"];

/// What [`find`] looks for
///
/// Extensions and users are both optional but at least one must be given,
/// otherwise nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindCriteria {
    /// Type extensions, without leading dots
    pub extensions: Vec<String>,
    /// Owner login names
    pub users: Vec<String>,
    /// Drop `.gz` and `.bz2` objects
    pub no_compressed: bool,
}

impl FindCriteria {
    /// Build criteria from comma separated lists
    #[must_use]
    pub fn parse(extensions: Option<&str>, users: Option<&str>, no_compressed: bool) -> Self {
        Self {
            extensions: extensions
                .map(|list| {
                    split_list(list)
                        .map(|e| e.trim_start_matches('.').to_string())
                        .collect()
                })
                .unwrap_or_default(),
            users: users
                .map(|list| split_list(list).map(str::to_string).collect())
                .unwrap_or_default(),
            no_compressed,
        }
    }

    /// Whether any search term was given
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.extensions.is_empty() || !self.users.is_empty()
    }

    fn matches(&self, obj: &FsObject, names: &mut NameCache) -> bool {
        let Some(meta) = obj.meta() else {
            return false;
        };

        if !self.extensions.is_empty() {
            let ext = type_extension(&obj.path);
            if !self.extensions.iter().any(|e| e == ext) {
                return false;
            }
        }

        if !self.users.is_empty() {
            let owner = names.user(meta.uid);
            if !self.users.iter().any(|u| u == owner) {
                return false;
            }
        }

        !(self.no_compressed && is_compressed(&obj.path))
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Whether the name ends in a compression suffix
#[must_use]
pub fn is_compressed(path: &Path) -> bool {
    file_name(path)
        .rsplit_once('.')
        .is_some_and(|(_, suffix)| COMPRESSED.contains(&suffix))
}

/// Extension naming the data format
///
/// `reads.fastq` and `reads.fastq.gz` both give `fastq`. A name without a
/// dot gives the empty string.
#[must_use]
pub fn type_extension(path: &Path) -> &str {
    let name = file_name(path);
    let Some((_, extensions)) = name.split_once('.') else {
        return "";
    };

    let mut parts = extensions.rsplit('.');
    let last = parts.next().unwrap_or("");
    if COMPRESSED.contains(&last) {
        parts.next().unwrap_or("")
    } else {
        last
    }
}

/// Lazy stream of objects matching a [`FindCriteria`]
pub struct Find<'a, I> {
    criteria: &'a FindCriteria,
    inner: I,
    names: NameCache,
}

impl<I> Iterator for Find<'_, I>
where
    I: Iterator<Item = FsObject>,
{
    type Item = FsObject;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.criteria.is_active() {
            return None;
        }
        loop {
            let obj = self.inner.next()?;
            if self.criteria.matches(&obj, &mut self.names) {
                debug!(path = %obj.path.display(), "match");
                return Some(obj);
            }
        }
    }
}

/// Objects of a walk that match `criteria`, in walk order
pub fn find<I>(objects: I, criteria: &FindCriteria) -> Find<'_, I::IntoIter>
where
    I: IntoIterator<Item = FsObject>,
{
    Find {
        criteria,
        inner: objects.into_iter(),
        names: NameCache::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ObjectKind, ObjectMeta, TreeWalker};
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn names(objects: impl Iterator<Item = FsObject>) -> Vec<String> {
        objects.map(|o| o.path.display().to_string()).collect()
    }

    #[test]
    fn test_type_extension() {
        assert_eq!(type_extension(Path::new("x.fastq")), "fastq");
        assert_eq!(type_extension(Path::new("dir/x.fastq.gz")), "fastq");
        assert_eq!(type_extension(Path::new("x.tar.bz2")), "tar");
        assert_eq!(type_extension(Path::new("archive.gz")), "");
        assert_eq!(type_extension(Path::new("README")), "");
    }

    #[test]
    fn test_is_compressed() {
        assert!(is_compressed(Path::new("a.fastq.gz")));
        assert!(is_compressed(Path::new("a.bz2")));
        assert!(!is_compressed(Path::new("a.fastq")));
        assert!(!is_compressed(Path::new("gz")));
    }

    #[test]
    fn test_parse_strips_dots() {
        let criteria = FindCriteria::parse(Some(".fastq, bam"), Some("alice,bob"), false);

        assert_eq!(criteria.extensions, vec!["fastq", "bam"]);
        assert_eq!(criteria.users, vec!["alice", "bob"]);
        assert!(criteria.is_active());
        assert!(!FindCriteria::parse(None, None, true).is_active());
    }

    #[test]
    fn test_find_by_extension() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("run")).unwrap();
        fs::write(tmp.path().join("run/x.fastq"), "").unwrap();
        fs::write(tmp.path().join("run/x.fastq.gz"), "").unwrap();
        fs::write(tmp.path().join("run/x.bam"), "").unwrap();
        let walker = TreeWalker::new(tmp.path()).unwrap();

        let all = FindCriteria::parse(Some("fastq"), None, false);
        assert_eq!(
            names(find(&walker, &all)),
            vec!["run/x.fastq", "run/x.fastq.gz"]
        );

        let plain = FindCriteria::parse(Some("fastq"), None, true);
        assert_eq!(names(find(&walker, &plain)), vec!["run/x.fastq"]);
    }

    #[test]
    fn test_no_criteria_matches_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.fastq"), "").unwrap();
        let walker = TreeWalker::new(tmp.path()).unwrap();

        assert_eq!(find(&walker, &FindCriteria::default()).count(), 0);
    }

    #[test]
    fn test_find_by_unknown_user() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.fastq"), "").unwrap();
        let walker = TreeWalker::new(tmp.path()).unwrap();

        let criteria = FindCriteria::parse(None, Some("no-such-user-here"), false);
        assert_eq!(find(&walker, &criteria).count(), 0);
    }

    #[test]
    fn test_find_by_owner_id() {
        let meta = ObjectMeta {
            size: 0,
            mode: 0o644,
            uid: 4_000_000_000,
            gid: 0,
            modified: None,
            link_target: None,
            link_status: None,
        };
        let objects = vec![
            FsObject::readable(
                PathBuf::from("mine.txt"),
                PathBuf::from("/x/mine.txt"),
                ObjectKind::File,
                meta,
            ),
            FsObject::unreadable(
                PathBuf::from("locked.txt"),
                PathBuf::from("/x/locked.txt"),
                Some(ObjectKind::File),
                &io::Error::from(io::ErrorKind::PermissionDenied),
            ),
        ];

        let criteria = FindCriteria::parse(Some("txt"), Some("4000000000"), false);
        assert_eq!(names(find(objects, &criteria)), vec!["mine.txt"]);
    }
}
