//! Two-pointer merge-join of sorted object streams

use std::cmp::Ordering;
use std::iter::Peekable;

use crate::scanner::FsObject;

/// One step of the merge
#[derive(Debug)]
pub enum Joined {
    /// Path only present in the left stream
    Left(FsObject),
    /// Path only present in the right stream
    Right(FsObject),
    /// Path present in both streams
    Both(FsObject, FsObject),
}

/// Walks two streams sorted by relative path in lockstep
pub struct MergeJoin<L: Iterator<Item = FsObject>, R: Iterator<Item = FsObject>> {
    left: Peekable<L>,
    right: Peekable<R>,
}

impl<L, R> MergeJoin<L, R>
where
    L: Iterator<Item = FsObject>,
    R: Iterator<Item = FsObject>,
{
    /// Join two streams; both must be sorted by [`FsObject::path`]
    pub fn new(left: L, right: R) -> Self {
        Self {
            left: left.peekable(),
            right: right.peekable(),
        }
    }
}

impl<L, R> Iterator for MergeJoin<L, R>
where
    L: Iterator<Item = FsObject>,
    R: Iterator<Item = FsObject>,
{
    type Item = Joined;

    fn next(&mut self) -> Option<Self::Item> {
        let order = match (self.left.peek(), self.right.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(l), Some(r)) => l.path.cmp(&r.path),
        };

        match order {
            Ordering::Less => self.left.next().map(Joined::Left),
            Ordering::Greater => self.right.next().map(Joined::Right),
            Ordering::Equal => match (self.left.next(), self.right.next()) {
                (Some(l), Some(r)) => Some(Joined::Both(l, r)),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ObjectKind, ObjectMeta};
    use std::path::PathBuf;

    fn obj(path: &str) -> FsObject {
        FsObject::readable(
            PathBuf::from(path),
            PathBuf::from("/").join(path),
            ObjectKind::File,
            ObjectMeta {
                size: 0,
                mode: 0o644,
                uid: 0,
                gid: 0,
                modified: None,
                link_target: None,
                link_status: None,
            },
        )
    }

    fn shape(joined: &Joined) -> (char, String) {
        match joined {
            Joined::Left(o) => ('L', o.path.display().to_string()),
            Joined::Right(o) => ('R', o.path.display().to_string()),
            Joined::Both(o, _) => ('B', o.path.display().to_string()),
        }
    }

    #[test]
    fn test_merge_interleaves() {
        let left = vec![obj("a"), obj("a/x"), obj("c")];
        let right = vec![obj("a"), obj("b"), obj("c"), obj("d")];

        let steps: Vec<_> = MergeJoin::new(left.into_iter(), right.into_iter())
            .map(|j| shape(&j))
            .collect();

        assert_eq!(
            steps,
            vec![
                ('B', "a".to_string()),
                ('L', "a/x".to_string()),
                ('R', "b".to_string()),
                ('B', "c".to_string()),
                ('R', "d".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_empty_sides() {
        let steps: Vec<_> = MergeJoin::new(Vec::new().into_iter(), vec![obj("only")].into_iter())
            .map(|j| shape(&j))
            .collect();

        assert_eq!(steps, vec![('R', "only".to_string())]);
        assert_eq!(
            MergeJoin::new(Vec::new().into_iter(), Vec::new().into_iter()).count(),
            0
        );
    }
}
