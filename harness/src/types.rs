use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static XML_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Code>(.*?)</Code>").expect("Failed to compile Code regex"));

static XML_MESSAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<Message>(.*?)</Message>").expect("Failed to compile Message regex")
});

static XML_RESOURCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<Resource>(.*?)</Resource>").expect("Failed to compile Resource regex")
});

static XML_REQUEST_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<RequestId>(.*?)</RequestId>").expect("Failed to compile RequestId regex")
});

/// An error response observed from an S3-compatible service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// HTTP status code of the response
    pub status: u16,
    /// Service error code, e.g. `NoSuchBucket`
    pub error_code: String,
    /// Human readable message, if the service sent one
    pub message: Option<String>,
    /// Resource the error refers to
    pub resource: Option<String>,
    /// Request identifier assigned by the service
    pub request_id: Option<String>,
}

impl ServerError {
    pub fn new<S: Into<String>>(status: u16, error_code: S) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: None,
            resource: None,
            request_id: None,
        }
    }

    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Build a server error from a status code and an S3 XML error document.
    ///
    /// Bodies without a `<Code>` element (HEAD responses, proxies) yield an
    /// empty error code.
    pub fn from_xml(status: u16, body: &str) -> Self {
        let capture = |pattern: &Regex| {
            pattern
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        };

        Self {
            status,
            error_code: capture(&XML_CODE_PATTERN).unwrap_or_default(),
            message: capture(&XML_MESSAGE_PATTERN),
            resource: capture(&XML_RESOURCE_PATTERN),
            request_id: capture(&XML_REQUEST_ID_PATTERN),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3 server error {} {}", self.status, self.error_code)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}
