use crate::error::{HarnessError, Result};
use crate::traits::ObjectStore;
use crate::types::ServerError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

static BUCKET_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$").expect("Failed to compile bucket name regex")
});

static IP_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("Failed to compile IP address regex")
});

const MAX_KEY_LENGTH: usize = 1024;

#[derive(Default)]
struct StoreState {
    buckets: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    pending_failures: VecDeque<HarnessError>,
    operation_failures: HashMap<String, VecDeque<HarnessError>>,
    calls: Vec<String>,
}

/// In-process object store with S3 error semantics, for tests.
///
/// Failures can be injected for the next call or for a named operation.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given buckets already created
    pub fn with_buckets<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut state = store.lock();
            for bucket in buckets {
                state.buckets.insert(bucket.into(), BTreeMap::new());
            }
        }
        store
    }

    /// Fail the next call, whatever operation it is
    pub fn fail_next(self, error: impl Into<HarnessError>) -> Self {
        self.lock().pending_failures.push_back(error.into());
        self
    }

    /// Fail the next call of `operation` (e.g. `"delete_key"`)
    pub fn fail_operation(&self, operation: &str, error: impl Into<HarnessError>) {
        self.lock()
            .operation_failures
            .entry(operation.to_string())
            .or_default()
            .push_back(error.into());
    }

    /// Every call made so far, rendered as `operation(args)`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn bucket_exists(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and pop any injected failure for it
    fn begin(&self, operation: &str, args: &[&str]) -> Result<MutexGuard<'_, StoreState>> {
        let mut state = self.lock();
        state.calls.push(format!("{}({})", operation, args.join(", ")));

        if let Some(error) = state.pending_failures.pop_front() {
            return Err(error);
        }
        if let Some(error) = state
            .operation_failures
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(state)
    }
}

fn no_such_bucket(bucket: &str) -> HarnessError {
    ServerError::new(404, "NoSuchBucket")
        .with_message(format!("The specified bucket does not exist: {}", bucket))
        .into()
}

fn valid_bucket_name(bucket: &str) -> bool {
    BUCKET_NAME_PATTERN.is_match(bucket) && !bucket.contains("..") && !IP_ADDRESS_PATTERN.is_match(bucket)
}

impl ObjectStore for InMemoryStore {
    fn get_bucket(&self, bucket: &str) -> Result<()> {
        let state = self.begin("get_bucket", &[bucket])?;
        if state.buckets.contains_key(bucket) {
            Ok(())
        } else {
            Err(no_such_bucket(bucket))
        }
    }

    fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.begin("create_bucket", &[bucket])?;
        if !valid_bucket_name(bucket) {
            return Err(ServerError::new(400, "InvalidBucketName")
                .with_message("The specified bucket is not valid")
                .into());
        }
        if state.buckets.contains_key(bucket) {
            return Err(ServerError::new(409, "BucketAlreadyOwnedByYou").into());
        }
        state.buckets.insert(bucket.to_string(), BTreeMap::new());
        Ok(())
    }

    fn list_keys(&self, bucket: &str) -> Result<Vec<String>> {
        let state = self.begin("list_keys", &[bucket])?;
        state
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .ok_or_else(|| no_such_bucket(bucket))
    }

    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        let mut state = self.begin("put_object", &[bucket, key])?;
        if key.len() > MAX_KEY_LENGTH {
            return Err(ServerError::new(400, "KeyTooLong").into());
        }
        let objects = state.buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let state = self.begin("get_object", &[bucket, key])?;
        let objects = state.buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.get(key).cloned().ok_or_else(|| {
            ServerError::new(404, "NoSuchKey")
                .with_message("The specified key does not exist.")
                .into()
        })
    }

    fn delete_key(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.begin("delete_key", &[bucket, key])?;
        let objects = state.buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.remove(key);
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.begin("delete_bucket", &[bucket])?;
        let is_empty = match state.buckets.get(bucket) {
            Some(objects) => objects.is_empty(),
            None => return Err(no_such_bucket(bucket)),
        };
        if !is_empty {
            return Err(ServerError::new(409, "BucketNotEmpty").into());
        }
        state.buckets.remove(bucket);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::assert_server_error;
    use crate::matcher::s3_error_codes;

    #[test]
    fn test_bucket_lifecycle() {
        let store = InMemoryStore::new();

        store.create_bucket("photos").unwrap();
        store.put_object("photos", "cat.jpg", b"meow").unwrap();
        assert_eq!(store.get_object("photos", "cat.jpg").unwrap(), b"meow");
        assert_eq!(store.list_keys("photos").unwrap(), vec!["cat.jpg"]);

        store.delete_key("photos", "cat.jpg").unwrap();
        store.delete_bucket("photos").unwrap();
        assert!(!store.bucket_exists("photos"));
    }

    #[test]
    fn test_error_semantics_match_catalogue() {
        let store = InMemoryStore::with_buckets(["full"]);
        store.put_object("full", "k", b"v").unwrap();
        let codes = s3_error_codes();

        assert_server_error(codes.lookup("client.BucketNotEmpty").unwrap(), || {
            store.delete_bucket("full")
        })
        .unwrap();
        assert_server_error(codes.lookup("client.NoSuchKey").unwrap(), || {
            store.get_object("full", "missing")
        })
        .unwrap();
        assert_server_error(codes.lookup("client.NoSuchBucket").unwrap(), || {
            store.list_keys("nowhere")
        })
        .unwrap();
        assert_server_error(codes.lookup("client.KeyTooLong").unwrap(), || {
            store.put_object("full", &"k".repeat(1025), b"")
        })
        .unwrap();
    }

    #[test]
    fn test_bucket_name_restrictions() {
        let store = InMemoryStore::new();
        let invalid = codes_invalid_bucket_name();
        let too_long = "a".repeat(256);

        for name in ["ab", ".mybucket", "my......", "192.168.5.4", "UPPER", too_long.as_str()] {
            assert_server_error(invalid, || store.create_bucket(name)).unwrap();
        }
        assert!(store.create_bucket("my-bucket.example").is_ok());
    }

    fn codes_invalid_bucket_name() -> &'static crate::matcher::MatcherNode {
        s3_error_codes().lookup("client.InvalidBucketName").unwrap()
    }

    #[test]
    fn test_injected_failures() {
        let store = InMemoryStore::with_buckets(["b"]).fail_next(HarnessError::transport("down"));
        store.fail_operation("delete_key", ServerError::new(403, "AccessDenied"));

        assert!(matches!(store.get_bucket("b"), Err(HarnessError::Transport { .. })));
        assert!(store.get_bucket("b").is_ok());
        assert!(matches!(store.delete_key("b", "k"), Err(HarnessError::Server(_))));
        assert!(store.delete_key("b", "k").is_ok());
        assert_eq!(store.calls().len(), 4);
    }
}
