//! Common types and utilities for command execution

use std::path::Path;

use anyhow::Context;
use stoker::config::{ConfigValidator, PatternMatcher};
use stoker::report::Format;
use stoker::{Config, ConfigManager, TreeWalker};
use tracing::debug;

/// Options shared by every subcommand
pub struct RunOptions<'a> {
    /// Output rendering
    pub format: Format,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
    /// Extra ignore patterns from the command line
    pub ignore: &'a [String],
}

impl<'a> RunOptions<'a> {
    /// Create new run options
    #[must_use]
    pub const fn new(
        format: Format,
        config_path: Option<&'a Path>,
        no_config: bool,
        ignore: &'a [String],
    ) -> Self {
        Self {
            format,
            config_path,
            no_config,
            ignore,
        }
    }

    /// Load the merged configuration with command line patterns appended
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = if self.no_config {
            debug!("config files disabled");
            Config::default()
        } else {
            ConfigManager::load(self.config_path).context("Failed to load configuration")?
        };

        config.ignore.extend(self.ignore.iter().cloned());
        ConfigValidator::validate(&config).context("Invalid --ignore pattern")?;
        Ok(config)
    }

    /// Open a tree for walking with the configured filter
    pub fn open(root: &Path, matcher: &PatternMatcher) -> anyhow::Result<TreeWalker> {
        let walker = TreeWalker::new(root)
            .with_context(|| format!("Failed to open {}", root.display()))?;
        Ok(walker.with_matcher(matcher.clone()))
    }
}
