//! Integration tests for the access audit on real trees

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::{AccessChecker, AccessIssue, IssueReason};
use crate::scanner::TreeWalker;

fn audit(root: &Path) -> Vec<AccessIssue> {
    let walker = TreeWalker::new(root).unwrap();
    AccessChecker::for_current_user().audit(&walker).collect()
}

#[test]
fn test_clean_tree_has_no_issues() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("a/b")).unwrap();
    fs::write(tmp.path().join("a/b/c.txt"), "ok").unwrap();
    fs::write(tmp.path().join("top.txt"), "ok").unwrap();

    assert!(audit(tmp.path()).is_empty());
}

#[test]
#[cfg(unix)]
fn test_broken_symlink_reported() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    symlink("does-not-exist", tmp.path().join("dangling")).unwrap();
    fs::write(tmp.path().join("fine.txt"), "ok").unwrap();

    let issues = audit(tmp.path());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, Path::new("dangling"));
    assert_eq!(issues[0].reason, IssueReason::BrokenSymlink);
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_reported_with_owner() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let locked = tmp.path().join("locked.dat");
    fs::write(&locked, "secret").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o200)).unwrap();

    let issues = audit(tmp.path());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].reason, IssueReason::PermissionDenied);
    assert_eq!(issues[0].permissions.as_deref(), Some("-w-------"));
    assert!(issues[0].owner.is_some());
    assert!(issues[0].group.is_some());
}

#[test]
#[cfg(unix)]
fn test_locked_directory_reported_once() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let locked = tmp.path().join("locked");
    fs::create_dir_all(locked.join("deep/er")).unwrap();
    fs::write(locked.join("deep/er/file"), "x").unwrap();
    fs::write(tmp.path().join("zz.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let issues = audit(tmp.path());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, Path::new("locked"));
    assert_eq!(issues[0].reason, IssueReason::SubtreeInaccessible);
}

#[test]
#[cfg(unix)]
fn test_issues_follow_walk_order() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("m")).unwrap();
    symlink("gone", tmp.path().join("m/link")).unwrap();
    symlink("gone", tmp.path().join("a-link")).unwrap();
    symlink("gone", tmp.path().join("z-link")).unwrap();

    let paths: Vec<_> = audit(tmp.path()).into_iter().map(|i| i.path).collect();

    assert_eq!(
        paths,
        vec![
            Path::new("a-link").to_path_buf(),
            Path::new("m/link").to_path_buf(),
            Path::new("z-link").to_path_buf(),
        ]
    );
}
