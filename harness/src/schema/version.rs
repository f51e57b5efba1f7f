use crate::error::{HarnessError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Statuses a version response may come with
pub const EXPECTED_STATUS: &[u16] = &[200];

/// Body of `GET /v2.1/` on the compute API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VersionResponse {
    pub version: VersionDetail,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VersionDetail {
    pub id: String,
    pub links: Vec<Link>,
    #[serde(rename = "media-types")]
    pub media_types: Vec<MediaType>,
    pub status: String,
    pub updated: DateTime<Utc>,
    /// Only reported by newer deployments
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub min_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Link {
    pub href: Url,
    pub rel: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaType {
    pub base: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Check the status and decode a version response body
pub fn decode_version_response(status: u16, body: &str) -> Result<VersionResponse> {
    if !EXPECTED_STATUS.contains(&status) {
        return Err(HarnessError::UnexpectedStatus {
            status,
            expected: EXPECTED_STATUS.to_vec(),
        });
    }

    serde_json::from_str(body).map_err(|e| HarnessError::Schema {
        message: e.to_string(),
    })
}
