//! Symlink inspection with loop detection and broken link handling
//!
//! Links are never followed during a walk. They are only resolved here to
//! record whether the target exists.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::object::LinkStatus;

/// Maximum number of hops before a chain is treated as a loop
const MAX_HOPS: usize = 40;

/// Read the raw link text and resolve the chain it starts
///
/// # Errors
///
/// Returns an error if the link itself cannot be read.
pub fn inspect(link: &Path) -> io::Result<(PathBuf, LinkStatus)> {
    let target = fs::read_link(link)?;
    let status = resolve_chain(link);
    Ok((target, status))
}

/// Follow a symlink chain hop by hop, detecting loops
fn resolve_chain(link: &Path) -> LinkStatus {
    let mut visited = HashSet::new();
    let mut current = link.to_path_buf();

    for _ in 0..MAX_HOPS {
        if !visited.insert(current.clone()) {
            return LinkStatus::Loop;
        }

        let metadata = match fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) => return status_for(&e),
        };

        if !metadata.is_symlink() {
            return match dunce::canonicalize(&current) {
                Ok(resolved) => LinkStatus::Resolved(resolved),
                Err(e) => status_for(&e),
            };
        }

        let target = match fs::read_link(&current) {
            Ok(t) => t,
            Err(e) => return status_for(&e),
        };

        // Relative targets are relative to the directory holding the link
        current = if target.is_relative() {
            current
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(&target)
        } else {
            target
        };
    }

    LinkStatus::Loop
}

fn status_for(err: &io::Error) -> LinkStatus {
    match err.kind() {
        io::ErrorKind::PermissionDenied => LinkStatus::Denied,
        _ if is_loop_error(err) => LinkStatus::Loop,
        _ => LinkStatus::Broken,
    }
}

#[cfg(unix)]
fn is_loop_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
fn is_loop_error(_err: &io::Error) -> bool {
    false
}
