//! The invoking user's identity and uid/gid name lookups

use std::collections::HashMap;

#[cfg(unix)]
use tracing::warn;

/// User and groups that access is evaluated for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    uid: u32,
    gid: u32,
    groups: Vec<u32>,
}

impl Identity {
    /// Identity with explicit ids
    #[must_use]
    pub const fn new(uid: u32, gid: u32, groups: Vec<u32>) -> Self {
        Self { uid, gid, groups }
    }

    /// Real uid, gid and supplementary groups of this process
    #[cfg(unix)]
    #[must_use]
    pub fn current() -> Self {
        let groups = match uzers::group_access_list() {
            Ok(groups) => groups.iter().map(uzers::Group::gid).collect(),
            Err(err) => {
                warn!(error = %err, "cannot list supplementary groups");
                Vec::new()
            }
        };
        Self::new(uzers::get_current_uid(), uzers::get_current_gid(), groups)
    }

    /// Without unix ownership every object belongs to the caller
    #[cfg(not(unix))]
    #[must_use]
    pub fn current() -> Self {
        Self::new(0, 0, Vec::new())
    }

    /// User id
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    /// Whether `gid` is the primary group or a supplementary group
    #[must_use]
    pub fn in_group(&self, gid: u32) -> bool {
        self.gid == gid || self.groups.contains(&gid)
    }
}

/// Look up the login name for a uid
#[cfg(unix)]
#[must_use]
pub fn user_name(uid: u32) -> Option<String> {
    uzers::get_user_by_uid(uid).map(|user| user.name().to_string_lossy().into_owned())
}

/// Look up the group name for a gid
#[cfg(unix)]
#[must_use]
pub fn group_name(gid: u32) -> Option<String> {
    uzers::get_group_by_gid(gid).map(|group| group.name().to_string_lossy().into_owned())
}

/// Look up the login name for a uid
#[cfg(not(unix))]
#[must_use]
pub fn user_name(_uid: u32) -> Option<String> {
    None
}

/// Look up the group name for a gid
#[cfg(not(unix))]
#[must_use]
pub fn group_name(_gid: u32) -> Option<String> {
    None
}

/// Memoised uid/gid to name resolution
///
/// Unknown ids render as the number itself.
#[derive(Debug, Default)]
pub struct NameCache {
    users: HashMap<u32, String>,
    groups: HashMap<u32, String>,
}

impl NameCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of a user, or its numeric id
    pub fn user(&mut self, uid: u32) -> &str {
        self.users
            .entry(uid)
            .or_insert_with(|| user_name(uid).unwrap_or_else(|| uid.to_string()))
    }

    /// Name of a group, or its numeric id
    pub fn group(&mut self, gid: u32) -> &str {
        self.groups
            .entry(gid)
            .or_insert_with(|| group_name(gid).unwrap_or_else(|| gid.to_string()))
    }
}
