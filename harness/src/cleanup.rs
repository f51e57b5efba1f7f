//! Deferred resource cleanup
//!
//! Tests register compensating actions while they allocate remote resources
//! and the ledger runs them at teardown, most recent first, so dependent
//! resources go away before the resources they depend on. A failing action
//! never stops the sweep; failures are only counted.

use crate::error::{HarnessError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Error type cleanup actions may fail with
pub type CleanupError = Box<dyn std::error::Error + Send + Sync>;

type CleanupFn = Box<dyn FnOnce() -> std::result::Result<(), CleanupError> + Send>;

/// Opaque handle returned by [`CleanupLedger::register`], used to cancel an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CleanupToken(u64);

impl CleanupToken {
    /// Sequence number of the entry
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CleanupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deferred call: a named closure plus a rendering of the arguments it owns.
///
/// The closure takes its arguments by move, so later mutation elsewhere cannot
/// change what runs at teardown. The rendered arguments only feed log lines.
pub struct CleanupAction {
    name: String,
    args: Vec<String>,
    kwargs: Vec<(String, String)>,
    action: CleanupFn,
}

impl CleanupAction {
    /// Create an action named `name` that runs `action` at teardown
    pub fn new<F, E>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
        E: Into<CleanupError>,
    {
        Self {
            name: name.into(),
            args: Vec::new(),
            kwargs: Vec::new(),
            action: Box::new(move || action().map_err(Into::into)),
        }
    }

    /// Record a positional argument for the call rendering
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Record a named argument for the call rendering
    pub fn kwarg(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.kwargs.push((key.into(), value.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable rendering of the call, e.g. `delete_key(bucket, key, force=true)`
    pub fn call_string(&self) -> String {
        let mut rendered = format!("{}({}", self.name, self.args.join(", "));
        if !self.kwargs.is_empty() && !self.args.is_empty() {
            rendered.push_str(", ");
        }
        let kwargs: Vec<String> = self
            .kwargs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        rendered.push_str(&kwargs.join(", "));
        rendered.push(')');
        rendered
    }

    /// Run the action, turning both errors and panics into a message
    fn run(self) -> std::result::Result<(), String> {
        let action = self.action;
        match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupAction")
            .field("call", &self.call_string())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

/// Ordered registry of compensating actions
#[derive(Debug, Default)]
pub struct CleanupLedger {
    entries: BTreeMap<CleanupToken, CleanupAction>,
    next_sequence: u64,
}

impl CleanupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` and return the token that cancels it
    pub fn register(&mut self, action: CleanupAction) -> CleanupToken {
        let token = CleanupToken(self.next_sequence);
        self.next_sequence += 1;
        self.entries.insert(token, action);
        token
    }

    /// Drop a pending action, e.g. because the test already removed the resource
    pub fn cancel(&mut self, token: CleanupToken) -> Result<()> {
        self.entries
            .remove(&token)
            .map(|_| ())
            .ok_or(HarnessError::CleanupNotFound { token: token.0 })
    }

    /// Run every pending action, newest first, and return how many failed.
    ///
    /// Every entry is removed whether its action succeeded or not.
    pub fn drain(&mut self) -> usize {
        let mut failures = 0;

        while let Some((token, action)) = self.entries.pop_last() {
            let call = action.call_string();
            debug!(token = token.0, "Cleaning up: {}", call);
            if let Err(message) = action.run() {
                failures += 1;
                error!(token = token.0, "Cleanup failed {}: {}", call, message);
            }
        }

        failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `token` still refers to a pending action
    pub fn contains(&self, token: CleanupToken) -> bool {
        self.entries.contains_key(&token)
    }

    /// Rendered calls of the pending actions in the order they would run
    pub fn pending_calls(&self) -> Vec<String> {
        self.entries
            .values()
            .rev()
            .map(CleanupAction::call_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording(log: &Arc<Mutex<Vec<String>>>, name: &str) -> CleanupAction {
        let log = Arc::clone(log);
        let label = name.to_string();
        CleanupAction::new(name, move || {
            log.lock().unwrap().push(label);
            Ok::<(), HarnessError>(())
        })
    }

    fn failing(name: &str) -> CleanupAction {
        CleanupAction::new(name, || Err(HarnessError::transport("connection reset")))
    }

    #[test]
    fn test_tokens_strictly_increase() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let tokens: Vec<CleanupToken> = (0..5)
            .map(|i| ledger.register(recording(&log, &format!("a{}", i))))
            .collect();

        assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn test_tokens_not_reused_after_cancel() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = ledger.register(recording(&log, "a"));
        ledger.cancel(first).unwrap();
        let second = ledger.register(recording(&log, "b"));

        assert!(second > first);
    }

    #[test]
    fn test_drain_runs_in_reverse_registration_order() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        ledger.register(recording(&log, "A1"));
        ledger.register(recording(&log, "A2"));
        ledger.register(recording(&log, "A3"));

        assert_eq!(ledger.drain(), 0);
        assert_eq!(*log.lock().unwrap(), vec!["A3", "A2", "A1"]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_drain_counts_failures_and_empties_ledger() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        ledger.register(recording(&log, "first"));
        ledger.register(failing("broken"));
        ledger.register(recording(&log, "last"));

        assert_eq!(ledger.drain(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["last", "first"]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_drain_survives_panicking_action() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        ledger.register(recording(&log, "survivor"));
        ledger.register(CleanupAction::new("explode", || -> std::result::Result<(), HarnessError> {
            panic!("boom")
        }));

        assert_eq!(ledger.drain(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_all_failing_actions_still_drain() {
        let mut ledger = CleanupLedger::new();
        for i in 0..4 {
            ledger.register(failing(&format!("f{}", i)));
        }

        assert_eq!(ledger.drain(), 4);
        assert!(ledger.is_empty());
        assert_eq!(ledger.drain(), 0);
    }

    #[test]
    fn test_cancelled_action_is_not_run() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        ledger.register(recording(&log, "kept"));
        let token = ledger.register(recording(&log, "cancelled"));
        ledger.cancel(token).unwrap();

        assert!(!ledger.contains(token));
        assert_eq!(ledger.drain(), 0);
        assert_eq!(*log.lock().unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_cancel_unknown_token_fails() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let token = ledger.register(recording(&log, "once"));
        ledger.cancel(token).unwrap();

        let err = ledger.cancel(token).unwrap_err();
        assert!(matches!(err, HarnessError::CleanupNotFound { token: 0 }));
    }

    #[test]
    fn test_cancel_after_drain_fails() {
        let mut ledger = CleanupLedger::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let token = ledger.register(recording(&log, "ran"));
        ledger.drain();

        assert!(ledger.cancel(token).is_err());
    }

    #[test]
    fn test_call_string_rendering() {
        let noop = || Ok::<(), HarnessError>(());

        let bare = CleanupAction::new("close", noop);
        assert_eq!(bare.call_string(), "close()");

        let positional = CleanupAction::new("delete_key", noop).arg("bucket-1").arg("obj");
        assert_eq!(positional.call_string(), "delete_key(bucket-1, obj)");

        let named = CleanupAction::new("destroy", noop).kwarg("force", true);
        assert_eq!(named.call_string(), "destroy(force=true)");

        let mixed = CleanupAction::new("destroy_bucket", noop)
            .arg("bucket-1")
            .kwarg("retries", 3)
            .kwarg("force", false);
        assert_eq!(
            mixed.call_string(),
            "destroy_bucket(bucket-1, retries=3, force=false)"
        );
    }

    #[test]
    fn test_pending_calls_in_execution_order() {
        let mut ledger = CleanupLedger::new();
        let noop = || Ok::<(), HarnessError>(());

        ledger.register(CleanupAction::new("first", noop));
        ledger.register(CleanupAction::new("second", noop));

        assert_eq!(ledger.pending_calls(), vec!["second()", "first()"]);
    }
}
