//! Configuration types and structures

use serde::{Deserialize, Serialize};

/// Default size above which file contents are compared by SHA-256 digest
pub const DEFAULT_CHECKSUM_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Main configuration structure
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// ignore = [".snakemake/", "*.tmp"]
/// include = ["keep.tmp"]
/// compare_times = false
/// checksum_threshold = 16777216
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Patterns to skip while walking
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Patterns to explicitly include (override ignores)
    #[serde(default)]
    pub include: Vec<String>,

    /// Report files whose modification times differ
    #[serde(default)]
    pub compare_times: bool,

    /// Files larger than this many bytes are compared by checksum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_threshold: Option<u64>,
}

impl Config {
    /// Checksum threshold with the default applied
    #[must_use]
    pub fn checksum_threshold(&self) -> u64 {
        self.checksum_threshold.unwrap_or(DEFAULT_CHECKSUM_THRESHOLD)
    }
}
