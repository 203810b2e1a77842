//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Project config file name
pub const PROJECT_FILE: &str = ".stoker.toml";

/// Untracked, machine-local project config file name
pub const LOCAL_FILE: &str = ".stoker.local.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project-local config (.stoker.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.stoker.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Files that were found, lowest precedence first
    pub fn in_merge_order(&self) -> impl Iterator<Item = &Path> {
        [&self.global, &self.project, &self.local, &self.cli]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// A CLI path is kept even if it does not exist, so that loading it
    /// reports the mistake instead of silently ignoring it.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let start = std::env::current_dir().ok();
        Self::discover_from(cli_path, start.as_deref(), dirs::config_dir().as_deref())
    }

    /// Discovery with explicit search start and global config directory
    #[must_use]
    pub fn discover_from(
        cli_path: Option<&Path>,
        start: Option<&Path>,
        config_dir: Option<&Path>,
    ) -> ConfigFiles {
        ConfigFiles {
            cli: cli_path.map(Path::to_path_buf),
            local: start.and_then(|s| Self::find_file(s, LOCAL_FILE)),
            project: start.and_then(|s| Self::find_file(s, PROJECT_FILE)),
            global: config_dir.and_then(Self::find_global_config),
        }
    }

    /// Find a config file in `start` or its parent directories
    fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Find global config in XDG config directory
    fn find_global_config(config_dir: &Path) -> Option<PathBuf> {
        let global_config = config_dir.join("stoker").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}
