//! Gitignore-style pattern matching using the ignore crate

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, StokerError};

/// Decides which relative paths a walk should skip
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    gitignore: Option<Gitignore>,
}

impl PatternMatcher {
    /// Create a matcher that includes everything
    #[must_use]
    pub const fn new() -> Self {
        Self { gitignore: None }
    }

    /// Build pattern matcher from ignore and include patterns
    ///
    /// Include patterns are negated ignores, so they re-admit paths an
    /// earlier ignore pattern excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are invalid.
    pub fn with_patterns(ignore_patterns: &[String], include_patterns: &[String]) -> Result<Self> {
        if ignore_patterns.is_empty() && include_patterns.is_empty() {
            return Ok(Self::new());
        }

        let mut builder = GitignoreBuilder::new("");

        for pattern in ignore_patterns {
            builder
                .add_line(None, pattern)
                .map_err(|source| StokerError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        for pattern in include_patterns {
            builder
                .add_line(None, &format!("!{pattern}"))
                .map_err(|source| StokerError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let gitignore = builder.build().map_err(|source| StokerError::Pattern {
            pattern: ignore_patterns.join(", "),
            source,
        })?;

        Ok(Self {
            gitignore: Some(gitignore),
        })
    }

    /// Check if a relative path should be walked
    #[must_use]
    pub fn should_include(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore
            .as_ref()
            .is_none_or(|gi| !gi.matched(path, is_dir).is_ignore())
    }
}
