//! S3 Harness - shared machinery for S3-compatible storage conformance suites
//!
//! This crate provides the deferred cleanup ledger and the hierarchical error
//! classifier that suites are built on, together with the per-suite fixture,
//! capability checks and the S3 error code catalogue.

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Main functionality modules
pub mod assertions;
pub mod capability;
pub mod case;
pub mod cleanup;
pub mod matcher;
pub mod schema;
pub mod testing;

// Re-export main types for convenience
pub use case::{destroy_bucket, S3TestCase};
pub use cleanup::{CleanupAction, CleanupLedger, CleanupToken};
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use matcher::{s3_error_codes, CodeDefinition, MatcherKind, MatcherNode};
pub use traits::ObjectStore;
pub use types::ServerError;
