use crate::error::{CliError, Result};
use crate::ui;
use dialoguer::{theme::ColorfulTheme, Confirm};
use s3_harness::capability::skip_checks;
use s3_harness::config::{ensure_config_file_exists, HarnessConfig};
use s3_harness::HarnessError;
use std::path::Path;

/// Load and validate the configuration at `path`
pub fn load_checked(path: &Path) -> Result<HarnessConfig> {
    HarnessConfig::load_with_validation(path).map_err(|err| match err {
        HarnessError::ConfigNotFound { path } => CliError::ConfigNotFound(path),
        other => other.into(),
    })
}

/// Reason suites would be skipped with this configuration, if any
pub fn skip_reason(config: &HarnessConfig) -> Option<String> {
    match skip_checks(config) {
        Ok(()) if config.s3.credentials().is_none() => Some("AWS credentials not set".to_string()),
        Ok(()) => None,
        Err(HarnessError::Skip { reason }) => Some(reason),
        Err(other) => Some(other.to_string()),
    }
}

pub fn execute(config_path: String, init: bool, verbose: bool) -> Result<()> {
    let config_path = Path::new(&config_path);

    if init || !config_path.exists() {
        if init {
            ui::section_header("S3 Harness Configuration Setup");
        } else {
            ui::warning_message("Configuration file not found");
        }

        let should_create = if init {
            true
        } else {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Would you like to create a default configuration file?")
                .interact()?
        };

        if !should_create {
            return Err(CliError::ConfigNotFound(config_path.to_path_buf()));
        }

        ui::status_message("Creating configuration file...");
        if ensure_config_file_exists(config_path, true)? {
            ui::success_message("Configuration file created successfully!");
            ui::info_message(&format!(
                "Edit {} to point at the S3 endpoint under test",
                config_path.display()
            ));
        } else {
            ui::info_message(&format!("{} already exists, leaving it untouched", config_path.display()));
        }
    }

    ui::status_message("Loading configuration...");
    let config = load_checked(config_path)?;
    ui::success_message(&format!("{} is valid", config_path.display()));

    if verbose {
        ui::section_header("Configuration");
        ui::field("S3 url", &config.s3.url);
        ui::field(
            "Credentials",
            if config.s3.credentials().is_some() { "set" } else { "not set" },
        );
        ui::field("EC2 API", &config.features.ec2_api.to_string());
        ui::field("Identity v2", &config.features.identity_v2.to_string());
        ui::field("Auth version", &config.identity.auth_version);
    }

    match skip_reason(&config) {
        Some(reason) => ui::warning_message(&format!("S3 suites would be skipped: {}", reason)),
        None => ui::success_message("S3 suites are enabled"),
    }

    Ok(())
}
