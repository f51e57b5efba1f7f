use crate::types::ServerError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Error types for harness operations
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An error response returned by the storage service
    #[error("{0}")]
    Server(ServerError),

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Skipped: {reason}")]
    Skip { reason: String },

    #[error("Assertion failed: {message}")]
    Assertion { message: String },

    #[error("No cleanup registered with token {token}")]
    CleanupNotFound { token: u64 },

    #[error("Teardown had {failures} cleanup failure(s)")]
    TearDown { failures: usize },

    #[error("Tries to redefine an error code \"{code}\"")]
    DuplicateErrorCode { code: String },

    #[error("Error code \"{code}\" is ambiguous: {reason}")]
    AmbiguousErrorCode { code: String, reason: String },

    #[error("Invalid pattern \"{pattern}\" for error code \"{code}\": {source}")]
    InvalidErrorPattern {
        code: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown error code path: {path}")]
    UnknownErrorCode { path: String },

    #[error("Unexpected status code {status}, expected one of {expected:?}")]
    UnexpectedStatus { status: u16, expected: Vec<u16> },

    #[error("Response does not match schema: {message}")]
    Schema { message: String },
}

impl From<ServerError> for HarnessError {
    fn from(error: ServerError) -> Self {
        Self::Server(error)
    }
}

impl HarnessError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new skip signal
    pub fn skip<S: Into<String>>(reason: S) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// Create a new assertion failure
    pub fn assertion<S: Into<String>>(message: S) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Whether this error asks the caller to skip rather than fail
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// The server error carried by this error, if any
    pub fn as_server_error(&self) -> Option<&ServerError> {
        match self {
            Self::Server(error) => Some(error),
            _ => None,
        }
    }
}
