//! Error types for the stoker library
//!
//! Only setup failures are errors. Anything that goes wrong while visiting a
//! single node of a tree is reported as an [`AccessReason`](crate::AccessReason)
//! inside the result stream instead.

use std::path::PathBuf;

/// Fatal errors raised before or outside a walk
#[derive(Debug, thiserror::Error)]
pub enum StokerError {
    /// A root given on the command line does not exist
    #[error("no such file or directory: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A root exists but is not a directory
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A root exists but could not be inspected
    #[error("cannot access {}: {source}", path.display())]
    RootInaccessible {
        /// The root that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`Config`](crate::Config)
    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Parser failure
        #[source]
        source: toml::de::Error,
    },

    /// The merged configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An ignore or include pattern could not be compiled
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Matcher failure
        #[source]
        source: ignore::Error,
    },
}

/// Result type alias using [`StokerError`]
pub type Result<T> = std::result::Result<T, StokerError>;
