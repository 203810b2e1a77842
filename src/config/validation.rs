//! Configuration validation and error reporting

use super::types::Config;
use crate::error::{Result, StokerError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        if config.checksum_threshold == Some(0) {
            return Err(StokerError::InvalidConfig(
                "checksum_threshold must be greater than zero".to_string(),
            ));
        }

        Self::check_patterns("ignore", &config.ignore)?;
        Self::check_patterns("include", &config.include)
    }

    fn check_patterns(field: &str, patterns: &[String]) -> Result<()> {
        match patterns.iter().position(|p| p.trim().is_empty()) {
            Some(i) => Err(StokerError::InvalidConfig(format!(
                "{field}[{i}] is an empty pattern"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_threshold() {
        let config = Config {
            checksum_threshold: Some(0),
            ..Config::default()
        };

        let result = ConfigValidator::validate(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("checksum_threshold"));
    }

    #[test]
    fn test_validate_empty_pattern() {
        let mut config = Config::default();
        config.ignore.push("   ".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.unwrap_err().to_string().contains("ignore[0] is an empty pattern"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            ignore: vec!["*.tmp".to_string()],
            include: vec!["important.tmp".to_string()],
            compare_times: true,
            checksum_threshold: Some(4096),
        };

        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
