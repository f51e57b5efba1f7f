use serde::{Deserialize, Serialize};

/// Main configuration structure for an S3 conformance run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Storage endpoint and credentials
    pub s3: S3Config,
    /// Which platform APIs are enabled
    #[serde(default)]
    pub features: FeatureConfig,
    /// Identity service settings
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// S3 endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Config {
    /// Endpoint URL, e.g. `http://localhost:8080`
    pub url: String,
    /// Access key id
    pub access_key: Option<String>,
    /// Secret access key
    pub secret_key: Option<String>,
}

impl S3Config {
    /// Access key and secret, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

/// Feature switches of the platform under test
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureConfig {
    /// Whether the EC2-compatible API (which carries S3) is deployed
    #[serde(default = "default_true")]
    pub ec2_api: bool,
    /// Whether the v2 identity API is available
    #[serde(default = "default_true")]
    pub identity_v2: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ec2_api: true,
            identity_v2: true,
        }
    }
}

/// Identity service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Identity API version used for authentication (`v2` or `v3`)
    #[serde(default = "default_auth_version")]
    pub auth_version: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            auth_version: default_auth_version(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_auth_version() -> String {
    "v2".to_string()
}
