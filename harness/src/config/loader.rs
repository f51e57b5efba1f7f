use crate::config::types::HarnessConfig;
use crate::config::validator::ConfigValidatorImpl;
use crate::error::{HarnessError, Result};
use crate::traits::ConfigValidator;
use std::path::Path;
use tracing::debug;

/// Configuration loader trait
pub trait ConfigLoader {
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<HarnessConfig>;
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<HarnessConfig>;
}

/// Default configuration loader implementation
pub struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<HarnessConfig> {
        let content = std::fs::read_to_string(&path).map_err(|_| HarnessError::ConfigNotFound {
            path: path.as_ref().to_path_buf(),
        })?;

        let config: HarnessConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration and validate it, with the file name in error messages
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<HarnessConfig> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(HarnessError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref).map_err(HarnessError::Io)?;

        let config: HarnessConfig = toml::from_str(&content).map_err(|e| {
            HarnessError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        ConfigValidatorImpl::new().validate_with_context(&config, path_ref)?;
        debug!(path = %path_ref.display(), "Loaded harness configuration");

        Ok(config)
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_from_file(path)
    }

    /// Load and validate configuration
    pub fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_with_validation(path)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        ConfigValidatorImpl::new().validate(self)
    }
}
