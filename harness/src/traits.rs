use crate::error::Result;

/// Storage operations the harness needs from an S3 client.
///
/// Service error responses are reported as [`crate::HarnessError::Server`],
/// connectivity problems as [`crate::HarnessError::Transport`].
pub trait ObjectStore: Send + Sync {
    /// Look up a bucket, failing when it does not exist or is not accessible
    fn get_bucket(&self, bucket: &str) -> Result<()>;

    /// Create a bucket
    fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Keys of all objects in a bucket
    fn list_keys(&self, bucket: &str) -> Result<Vec<String>>;

    /// Store an object
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()>;

    /// Read an object
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Delete one object
    fn delete_key(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete an empty bucket
    fn delete_bucket(&self, bucket: &str) -> Result<()>;
}

/// Trait for configuration validation
pub trait ConfigValidator: Send + Sync {
    type Config;

    /// Validate configuration
    fn validate(&self, config: &Self::Config) -> Result<()>;
}
