//! Typed response documents of the compute API

pub mod version;

pub use version::{decode_version_response, Link, MediaType, VersionDetail, VersionResponse};
