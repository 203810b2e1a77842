//! Configuration file parsing, merging, and pattern matching
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Gitignore-style pattern matching for walks
//! - Validation and error reporting

mod discovery;
mod merge;
mod patterns;
mod types;
mod validation;

pub use discovery::{ConfigDiscovery, ConfigFiles, LOCAL_FILE, PROJECT_FILE};
pub use merge::ConfigMerger;
pub use patterns::PatternMatcher;
pub use types::{Config, DEFAULT_CHECKSUM_THRESHOLD};
pub use validation::ConfigValidator;

use std::path::Path;

use crate::error::Result;

/// Coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path);
        Self::load_files(&config_files)
    }

    /// Merge and validate an explicit set of files
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load_files(files: &ConfigFiles) -> Result<Config> {
        let merged = ConfigMerger::merge(files)?;
        ConfigValidator::validate(&merged)?;
        Ok(merged)
    }
}

impl Config {
    /// Build the walk filter described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile.
    pub fn matcher(&self) -> Result<PatternMatcher> {
        PatternMatcher::with_patterns(&self.ignore, &self.include)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_files_validates() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("config.toml");
        fs::write(&file, "checksum_threshold = 0").unwrap();

        let files = ConfigFiles {
            cli: Some(file),
            ..ConfigFiles::default()
        };

        assert!(ConfigManager::load_files(&files).is_err());
    }

    #[test]
    fn test_config_matcher() {
        let config = Config {
            ignore: vec!["*.bak".to_string()],
            ..Config::default()
        };

        let matcher = config.matcher().unwrap();
        assert!(!matcher.should_include(Path::new("x.bak"), false));
        assert!(matcher.should_include(Path::new("x.fastq"), false));
    }
}
