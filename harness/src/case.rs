//! Per-suite fixture for S3 tests
//!
//! A fixture is created once per suite. It refuses to start when the
//! deployment cannot serve S3, owns the suite's cleanup ledger and turns
//! cleanup failures into a single teardown error.

use crate::assertions;
use crate::capability::{probe_s3, skip_checks};
use crate::cleanup::{CleanupAction, CleanupLedger, CleanupToken};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::matcher::{s3_error_codes, MatcherNode};
use crate::traits::ObjectStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Fixture shared by the tests of one S3 suite
pub struct S3TestCase<S: ObjectStore + 'static> {
    name: String,
    config: HarnessConfig,
    store: Arc<S>,
    ledger: CleanupLedger,
}

impl<S: ObjectStore + 'static> S3TestCase<S> {
    /// Run the skip checks and the S3 probe, then start with an empty ledger.
    ///
    /// Returns [`HarnessError::Skip`] when the suite cannot run.
    pub fn setup(name: impl Into<String>, config: HarnessConfig, store: Arc<S>) -> Result<Self> {
        let name = name.into();

        skip_checks(&config)?;
        if let Some(reason) = probe_s3(&config, store.as_ref()) {
            return Err(HarnessError::skip(format!("S3 {}: {}", name, reason)));
        }

        info!(case = %name, url = %config.s3.url, "S3 test case set up");
        Ok(Self {
            name,
            config,
            store,
            ledger: CleanupLedger::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Root of the S3 error code tree
    pub fn error_codes(&self) -> &'static MatcherNode {
        s3_error_codes()
    }

    /// Defer `action` to teardown
    pub fn add_resource_cleanup(&mut self, action: CleanupAction) -> CleanupToken {
        self.ledger.register(action)
    }

    /// Forget a deferred action the test made redundant
    pub fn cancel_resource_cleanup(&mut self, token: CleanupToken) -> Result<()> {
        self.ledger.cancel(token)
    }

    pub fn pending_cleanups(&self) -> usize {
        self.ledger.len()
    }

    /// Require `operation` to fail with the error at `code_path`, e.g. `client.NoSuchKey`
    pub fn assert_server_error<T, F>(&self, code_path: &str, operation: F) -> Result<()>
    where
        F: FnOnce() -> Result<T>,
    {
        let matcher = self.error_codes().lookup(code_path)?;
        assertions::assert_server_error(matcher, operation)
    }

    /// Create a bucket and schedule its destruction
    pub fn create_bucket(&mut self, bucket: &str) -> Result<CleanupToken> {
        self.store.create_bucket(bucket)?;

        let store = Arc::clone(&self.store);
        let name = bucket.to_string();
        let action = CleanupAction::new("destroy_bucket", move || destroy_bucket(store.as_ref(), &name))
            .arg(bucket);
        Ok(self.add_resource_cleanup(action))
    }

    /// Store an object and schedule its deletion
    pub fn create_object(&mut self, bucket: &str, key: &str, data: &[u8]) -> Result<CleanupToken> {
        self.store.put_object(bucket, key, data)?;

        let store = Arc::clone(&self.store);
        let (bucket_name, key_name) = (bucket.to_string(), key.to_string());
        let action = CleanupAction::new("delete_key", move || store.delete_key(&bucket_name, &key_name))
            .arg(bucket)
            .arg(key);
        Ok(self.add_resource_cleanup(action))
    }

    /// Drain the ledger and report cleanup failures
    pub fn teardown(self) -> Result<()> {
        self.teardown_with(|| Ok(()))
    }

    /// Drain the ledger, then run `extra` even when cleanups failed.
    ///
    /// An error from `extra` is returned as is; otherwise any cleanup
    /// failures are reported as [`HarnessError::TearDown`].
    pub fn teardown_with<F>(mut self, extra: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let failures = self.ledger.drain();
        extra()?;

        if failures > 0 {
            error!(case = %self.name, failures, "Teardown finished with cleanup failures");
            return Err(HarnessError::TearDown { failures });
        }
        Ok(())
    }
}

impl<S: ObjectStore + 'static> Drop for S3TestCase<S> {
    fn drop(&mut self) {
        if !self.ledger.is_empty() {
            warn!(
                case = %self.name,
                pending = self.ledger.len(),
                "Test case dropped without teardown, running pending cleanups"
            );
            self.ledger.drain();
        }
    }
}

/// Delete every object in `bucket`, then the bucket itself.
///
/// Each failed deletion is logged and counted; a non-zero count is reported
/// as [`HarnessError::TearDown`].
pub fn destroy_bucket<S: ObjectStore + ?Sized>(store: &S, bucket: &str) -> Result<()> {
    let mut failures = 0;

    match store.list_keys(bucket) {
        Ok(keys) => {
            for key in keys {
                if let Err(err) = store.delete_key(bucket, &key) {
                    error!(bucket, key = %key, "Failed to delete key: {}", err);
                    failures += 1;
                }
            }
            if let Err(err) = store.delete_bucket(bucket) {
                error!(bucket, "Failed to destroy bucket: {}", err);
                failures += 1;
            }
        }
        Err(err) => {
            error!(bucket, "Failed to destroy bucket: {}", err);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(HarnessError::TearDown { failures });
    }
    Ok(())
}
