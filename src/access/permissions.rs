//! Permission bit evaluation
//!
//! Exactly one class of bits applies to a user: owner bits if the user owns
//! the object, else group bits if the user is in the object's group, else
//! other bits. Higher classes never fall through to lower ones.

use super::identity::Identity;
use crate::scanner::ObjectMeta;

const READ: u32 = 0o4;
const EXECUTE: u32 = 0o1;

/// Which permission triplet applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionClass {
    /// The user owns the object
    Owner,
    /// The user is in the object's group
    Group,
    /// Everyone else
    Other,
}

impl PermissionClass {
    /// Select the class that applies to `identity` for an object
    #[must_use]
    pub fn for_object(identity: &Identity, uid: u32, gid: u32) -> Self {
        if identity.uid() == uid {
            Self::Owner
        } else if identity.in_group(gid) {
            Self::Group
        } else {
            Self::Other
        }
    }

    /// The three `rwx` bits of `mode` for this class
    #[must_use]
    pub const fn bits(self, mode: u32) -> u32 {
        let shift = match self {
            Self::Owner => 6,
            Self::Group => 3,
            Self::Other => 0,
        };
        (mode >> shift) & 0o7
    }
}

fn granted(identity: &Identity, meta: &ObjectMeta, wanted: u32) -> bool {
    let class = PermissionClass::for_object(identity, meta.uid, meta.gid);
    class.bits(meta.mode) & wanted == wanted
}

/// Whether the user may read the object
#[must_use]
pub fn can_read(identity: &Identity, meta: &ObjectMeta) -> bool {
    granted(identity, meta, READ)
}

/// Whether the user may list and enter a directory
#[must_use]
pub fn can_traverse(identity: &Identity, meta: &ObjectMeta) -> bool {
    granted(identity, meta, READ | EXECUTE)
}

/// `ls -l` style rendering of the nine permission bits
#[must_use]
pub fn mode_string(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit == 0 { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(mode: u32, uid: u32, gid: u32) -> ObjectMeta {
        ObjectMeta {
            size: 0,
            mode,
            uid,
            gid,
            modified: None,
            link_target: None,
            link_status: None,
        }
    }

    #[test]
    fn test_mode_string() {
        assert_eq!(mode_string(0o755), "rwxr-xr-x");
        assert_eq!(mode_string(0o640), "rw-r-----");
        assert_eq!(mode_string(0o000), "---------");
    }

    #[test]
    fn test_owner_bits_apply_to_owner() {
        let me = Identity::new(1000, 1000, vec![]);

        assert!(can_read(&me, &meta(0o400, 1000, 0)));
        assert!(!can_read(&me, &meta(0o044, 1000, 1000)));
    }

    #[test]
    fn test_group_bits_apply_to_member() {
        let me = Identity::new(1000, 1000, vec![50]);

        assert!(can_read(&me, &meta(0o040, 0, 50)));
        assert!(!can_read(&me, &meta(0o404, 0, 50)));
    }

    #[test]
    fn test_other_bits_apply_to_everyone_else() {
        let me = Identity::new(1000, 1000, vec![]);

        assert!(can_read(&me, &meta(0o004, 0, 0)));
        assert!(!can_read(&me, &meta(0o440, 0, 0)));
    }

    #[test]
    fn test_traverse_needs_read_and_execute() {
        let me = Identity::new(1000, 1000, vec![]);

        assert!(can_traverse(&me, &meta(0o700, 1000, 0)));
        assert!(!can_traverse(&me, &meta(0o600, 1000, 0)));
        assert!(!can_traverse(&me, &meta(0o300, 1000, 0)));
    }
}
