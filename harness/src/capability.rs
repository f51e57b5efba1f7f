//! Decide whether a suite can run against the configured deployment

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::traits::ObjectStore;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

/// Bucket name no service accepts; looking it up exercises authentication only
pub const PROBE_BUCKET: &str = "^INVALID*#()@INVALID.";

static ACCESS_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{20,}").expect("Failed to compile access key regex"));

static SECRET_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]{32,}").expect("Failed to compile secret key regex"));

/// Feature checks run before any resource is touched
pub fn skip_checks(config: &HarnessConfig) -> Result<()> {
    if !config.features.ec2_api {
        return Err(HarnessError::skip("The EC2 API is not available"));
    }
    if !config.features.identity_v2 || config.identity.auth_version != "v2" {
        return Err(HarnessError::skip("Identity v2 is not available"));
    }
    Ok(())
}

/// Why S3 cannot be reached, or `None` when it can.
///
/// A 403 on the probe bucket means the request was rejected before the name
/// was even considered, so the credentials are examined to explain it.
pub fn probe_s3<S: ObjectStore + ?Sized>(config: &HarnessConfig, store: &S) -> Option<String> {
    let reason = match check_endpoint(config) {
        Err(reason) => Some(reason),
        Ok(()) => match store.get_bucket(PROBE_BUCKET) {
            Ok(()) => None,
            Err(HarnessError::Server(error)) if error.status == 403 => {
                Some(explain_forbidden(config))
            }
            Err(HarnessError::Server(error)) => {
                debug!(status = error.status, code = %error.error_code, "S3 probe rejected bucket name");
                None
            }
            Err(other) => Some(other.to_string()),
        },
    };

    if let Some(reason) = &reason {
        warn!(url = %config.s3.url, "S3 is not usable: {}", reason);
    }
    reason
}

fn check_endpoint(config: &HarnessConfig) -> std::result::Result<(), String> {
    let has_host = Url::parse(&config.s3.url)
        .ok()
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false);
    if !has_host {
        return Err("Failed to get hostname from the s3_url".to_string());
    }

    if config.s3.credentials().is_none() {
        return Err("AWS credentials not set".to_string());
    }

    Ok(())
}

fn explain_forbidden(config: &HarnessConfig) -> String {
    let (access_key, secret_key) = config.s3.credentials().unwrap_or_default();

    if !ACCESS_KEY_PATTERN.is_match(access_key) {
        "Invalid AWS access Key".to_string()
    } else if !SECRET_KEY_PATTERN.is_match(secret_key) {
        "Invalid AWS secret Key".to_string()
    } else {
        "Unknown (Authentication?) Error".to_string()
    }
}
