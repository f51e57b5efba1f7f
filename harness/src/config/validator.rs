use crate::config::types::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::traits::ConfigValidator;
use std::path::Path;
use url::Url;

const AUTH_VERSIONS: [&str; 2] = ["v2", "v3"];

/// Configuration validator implementation
pub struct ConfigValidatorImpl;

impl ConfigValidator for ConfigValidatorImpl {
    type Config = HarnessConfig;

    fn validate(&self, config: &HarnessConfig) -> Result<()> {
        self.validate_with_context(config, "configuration")
    }
}

impl ConfigValidatorImpl {
    pub fn new() -> Self {
        Self
    }

    /// Validation with the config source named in error messages
    pub fn validate_with_context<P: AsRef<Path>>(
        &self,
        config: &HarnessConfig,
        config_path: P,
    ) -> Result<()> {
        let config_path_str = config_path.as_ref().to_string_lossy();

        if config.s3.url.trim().is_empty() {
            return Err(HarnessError::invalid_config(format!(
                "No S3 endpoint configured in {}. Set url in the [s3] section.",
                config_path_str
            )));
        }

        Url::parse(&config.s3.url).map_err(|e| {
            HarnessError::invalid_config(format!(
                "Invalid S3 url '{}' in {}: {}",
                config.s3.url, config_path_str, e
            ))
        })?;

        if config.s3.access_key.is_some() != config.s3.secret_key.is_some() {
            return Err(HarnessError::invalid_config(format!(
                "Both access_key and secret_key must be set in {} (or neither)",
                config_path_str
            )));
        }

        if !AUTH_VERSIONS.contains(&config.identity.auth_version.as_str()) {
            return Err(HarnessError::invalid_config(format!(
                "Invalid auth_version '{}' in {}. Valid versions: {}",
                config.identity.auth_version,
                config_path_str,
                AUTH_VERSIONS.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for ConfigValidatorImpl {
    fn default() -> Self {
        Self::new()
    }
}
