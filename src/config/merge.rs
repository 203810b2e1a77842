//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Arrays** (ignore, include): additive, all values from all configs are combined
//! - **Booleans**: OR semantics, if any config sets `true` the result is `true`
//! - **Optional scalars** (`checksum_threshold`): the highest-precedence file
//!   that sets the value wins

use std::fs;
use std::path::Path;

use tracing::debug;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::{Result, StokerError};

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .stoker.local.toml
    /// 3. .stoker.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        for path in files.in_merge_order() {
            Self::merge_into(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut Config, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "loading config file");

        let content = fs::read_to_string(path).map_err(|source| StokerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| StokerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        base.ignore.extend(config.ignore);
        base.include.extend(config.include);
        base.compare_times |= config.compare_times;
        if config.checksum_threshold.is_some() {
            base.checksum_threshold = config.checksum_threshold;
        }

        Ok(())
    }
}
