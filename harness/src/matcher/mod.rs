//! Hierarchical error classifier
//!
//! Error codes form a tree keyed by dotted path (`client.NoSuchBucket`).
//! Matching a node against an observed error checks the status against the
//! node's status pattern and the error code against its code pattern.

pub mod builder;
pub mod catalog;
pub mod node;

pub use builder::{build, CodeDefinition};
pub use catalog::{build_s3_error_codes, s3_error_codes, CLIENT_ERROR_CODES, SERVER_ERROR_CODES};
pub use node::{MatcherKind, MatcherNode, Pattern, ANY_CODE_PATTERN};
