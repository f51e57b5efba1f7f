//! Behaviour of the cleanup ledger as suites use it

mod common;

use common::*;
use s3_harness::{CleanupAction, CleanupLedger, HarnessError};

#[test]
fn test_drain_order_with_interleaved_cancel() {
    let log = call_log();
    let mut ledger = CleanupLedger::new();

    let _a1 = ledger.register(recording_action(&log, "A1"));
    let a2 = ledger.register(recording_action(&log, "A2"));
    let _a3 = ledger.register(recording_action(&log, "A3"));
    ledger.cancel(a2).unwrap();
    let _a4 = ledger.register(recording_action(&log, "A4"));

    assert_eq!(ledger.pending_calls(), vec!["A4()", "A3()", "A1()"]);
    assert_eq!(ledger.drain(), 0);
    assert_eq!(logged(&log), vec!["A4", "A3", "A1"]);
}

#[test]
fn test_one_failure_among_three() {
    let log = call_log();
    let mut ledger = CleanupLedger::new();

    ledger.register(recording_action(&log, "ok-1"));
    ledger.register(failing_action(&log, "broken"));
    ledger.register(recording_action(&log, "ok-2"));

    assert_eq!(ledger.drain(), 1);
    assert_eq!(logged(&log), vec!["ok-2", "broken", "ok-1"]);
    assert!(ledger.is_empty());
}

#[test]
fn test_failures_never_stop_the_sweep() {
    let log = call_log();
    let mut ledger = CleanupLedger::new();

    for i in 0..10 {
        let label = format!("step-{}", i);
        if i % 2 == 0 {
            ledger.register(failing_action(&log, &label));
        } else {
            ledger.register(recording_action(&log, &label));
        }
    }

    assert_eq!(ledger.drain(), 5);
    assert_eq!(logged(&log).len(), 10);
    assert!(ledger.is_empty());
}

#[test]
fn test_ledger_reusable_after_drain() {
    let log = call_log();
    let mut ledger = CleanupLedger::new();

    let first = ledger.register(recording_action(&log, "first-cycle"));
    ledger.drain();

    let second = ledger.register(recording_action(&log, "second-cycle"));
    assert!(second > first);
    assert_eq!(ledger.drain(), 0);
    assert_eq!(logged(&log), vec!["first-cycle", "second-cycle"]);
}

#[test]
fn test_arguments_are_owned_by_the_action() {
    let log = call_log();
    let mut ledger = CleanupLedger::new();

    let mut name = String::from("bucket-original");
    let captured = name.clone();
    let action_log = log.clone();
    ledger.register(
        CleanupAction::new("destroy_bucket", move || {
            action_log.lock().unwrap().push(captured);
            Ok::<(), HarnessError>(())
        })
        .arg(&name),
    );
    name.push_str("-mutated");

    assert_eq!(ledger.pending_calls(), vec!["destroy_bucket(bucket-original)"]);
    ledger.drain();
    assert_eq!(logged(&log), vec!["bucket-original"]);
}

#[test]
fn test_std_errors_are_accepted() {
    let mut ledger = CleanupLedger::new();
    ledger.register(CleanupAction::new("remove_file", || {
        std::fs::remove_file("/nonexistent/s3-harness/upload.bin")
    }));

    assert_eq!(ledger.drain(), 1);
}
