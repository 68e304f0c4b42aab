//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading superannuation
//! settings from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{VarianceError, VarianceResult};

use super::types::SuperConfig;

/// Loads and validates superannuation configuration.
///
/// # File Format
///
/// ```text
/// # config/super.yaml
/// ote_super_rate: "0.095"
/// ```
///
/// A missing `ote_super_rate` falls back to the statutory default. Unknown
/// keys are rejected so a misspelt option never silently keeps the default.
///
/// # Example
///
/// ```no_run
/// use super_variance::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/super.yaml").unwrap();
/// println!("Rate: {}", loader.ote_super_rate());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: SuperConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/super.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist
    /// - The file contains invalid YAML or unknown keys
    /// - The rate is outside `[0, 1]`
    pub fn load<P: AsRef<Path>>(path: P) -> VarianceResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| VarianceError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Example
    ///
    /// ```
    /// use super_variance::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str("ote_super_rate: \"0.105\"")?;
    /// assert_eq!(loader.ote_super_rate().to_string(), "0.105");
    /// # Ok::<(), super_variance::error::VarianceError>(())
    /// ```
    pub fn from_yaml_str(content: &str) -> VarianceResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> VarianceResult<Self> {
        // An empty document means "all defaults".
        let config: SuperConfig = if content.trim().is_empty() {
            SuperConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| VarianceError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?
        };

        Self::validate(&config)?;
        Ok(Self { config })
    }

    fn validate(config: &SuperConfig) -> VarianceResult<()> {
        if config.ote_super_rate < Decimal::ZERO || config.ote_super_rate > Decimal::ONE {
            return Err(VarianceError::InvalidConfig {
                field: "ote_super_rate".to_string(),
                message: format!(
                    "must be between 0 and 1, got {}",
                    config.ote_super_rate
                ),
            });
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &SuperConfig {
        &self.config
    }

    /// Returns the rate applied to OTE to compute super payable.
    pub fn ote_super_rate(&self) -> Decimal {
        self.config.ote_super_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    use crate::config::DEFAULT_OTE_SUPER_RATE;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_shipped_configuration() {
        let loader = ConfigLoader::load("./config/super.yaml");
        assert!(loader.is_ok(), "Failed to load config: {:?}", loader.err());
        assert_eq!(loader.unwrap().ote_super_rate(), dec("0.095"));
    }

    #[test]
    fn test_load_custom_rate() {
        let file = write_config("ote_super_rate: \"0.11\"\n");
        let loader = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(loader.ote_super_rate(), dec("0.11"));
    }

    #[test]
    fn test_numeric_yaml_rate_is_accepted() {
        let loader = ConfigLoader::from_yaml_str("ote_super_rate: 0.1").unwrap();
        assert_eq!(loader.ote_super_rate(), dec("0.1"));
    }

    #[test]
    fn test_empty_file_uses_default_rate() {
        let file = write_config("");
        let loader = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(loader.ote_super_rate(), DEFAULT_OTE_SUPER_RATE);
    }

    #[test]
    fn test_default_loader_uses_statutory_rate() {
        assert_eq!(ConfigLoader::default().ote_super_rate(), dec("0.095"));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/super.yaml");
        match result {
            Err(VarianceError::ConfigNotFound { path }) => {
                assert!(path.contains("super.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ConfigLoader::from_yaml_str("ote_rate: \"0.11\"");
        assert!(matches!(result, Err(VarianceError::ConfigParseError { .. })));
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let result = ConfigLoader::from_yaml_str("ote_super_rate: [unclosed");
        assert!(matches!(result, Err(VarianceError::ConfigParseError { .. })));
    }

    #[test]
    fn test_rate_above_one_is_rejected() {
        let result = ConfigLoader::from_yaml_str("ote_super_rate: \"9.5\"");
        match result {
            Err(VarianceError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "ote_super_rate");
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result = ConfigLoader::from_yaml_str("ote_super_rate: \"-0.01\"");
        assert!(matches!(result, Err(VarianceError::InvalidConfig { .. })));
    }
}
