//! S3 error codes and the statuses they are returned with

use super::builder::build;
use super::node::{MatcherKind, MatcherNode};
use crate::error::Result;
use once_cell::sync::Lazy;

/// Client error codes; `None` accepts any 4xx status
pub const CLIENT_ERROR_CODES: &[(&str, Option<u16>)] = &[
    ("AccessDenied", Some(403)),
    ("AccountProblem", Some(403)),
    ("AmbiguousGrantByEmailAddress", Some(400)),
    ("BadDigest", Some(400)),
    ("BucketAlreadyExists", Some(409)),
    ("BucketAlreadyOwnedByYou", Some(409)),
    ("BucketNotEmpty", Some(409)),
    ("CredentialsNotSupported", Some(400)),
    ("CrossLocationLoggingProhibited", Some(403)),
    ("EntityTooSmall", Some(400)),
    ("EntityTooLarge", Some(400)),
    ("ExpiredToken", Some(400)),
    ("IllegalVersioningConfigurationException", Some(400)),
    ("IncompleteBody", Some(400)),
    ("IncorrectNumberOfFilesInPostRequest", Some(400)),
    ("InlineDataTooLarge", Some(400)),
    ("InvalidAccessKeyId", Some(403)),
    ("InvalidAddressingHeader", None),
    ("InvalidArgument", Some(400)),
    ("InvalidBucketName", Some(400)),
    ("InvalidBucketState", Some(409)),
    ("InvalidDigest", Some(400)),
    ("InvalidLocationConstraint", Some(400)),
    ("InvalidPart", Some(400)),
    ("InvalidPartOrder", Some(400)),
    ("InvalidPayer", Some(403)),
    ("InvalidPolicyDocument", Some(400)),
    ("InvalidRange", Some(416)),
    ("InvalidRequest", Some(400)),
    ("InvalidSecurity", Some(403)),
    ("InvalidSOAPRequest", Some(400)),
    ("InvalidStorageClass", Some(400)),
    ("InvalidTargetBucketForLogging", Some(400)),
    ("InvalidToken", Some(400)),
    ("InvalidURI", Some(400)),
    ("KeyTooLong", Some(400)),
    ("MalformedACLError", Some(400)),
    ("MalformedPOSTRequest", Some(400)),
    ("MalformedXML", Some(400)),
    ("MaxMessageLengthExceeded", Some(400)),
    ("MaxPostPreDataLengthExceededError", Some(400)),
    ("MetadataTooLarge", Some(400)),
    ("MethodNotAllowed", Some(405)),
    ("MissingAttachment", None),
    ("MissingContentLength", Some(411)),
    ("MissingRequestBodyError", Some(400)),
    ("MissingSecurityElement", Some(400)),
    ("MissingSecurityHeader", Some(400)),
    ("NoLoggingStatusForKey", Some(400)),
    ("NoSuchBucket", Some(404)),
    ("NoSuchKey", Some(404)),
    ("NoSuchLifecycleConfiguration", Some(404)),
    ("NoSuchUpload", Some(404)),
    ("NoSuchVersion", Some(404)),
    ("NotSignedUp", Some(403)),
    ("NotSuchBucketPolicy", Some(404)),
    ("OperationAborted", Some(409)),
    ("PermanentRedirect", Some(301)),
    ("PreconditionFailed", Some(412)),
    ("Redirect", Some(307)),
    ("RequestIsNotMultiPartContent", Some(400)),
    ("RequestTimeout", Some(400)),
    ("RequestTimeTooSkewed", Some(403)),
    ("RequestTorrentOfBucketError", Some(400)),
    ("SignatureDoesNotMatch", Some(403)),
    ("TemporaryRedirect", Some(307)),
    ("TokenRefreshRequired", Some(400)),
    ("TooManyBuckets", Some(400)),
    ("UnexpectedContent", Some(400)),
    ("UnresolvableGrantByEmailAddress", Some(400)),
    ("UserKeyMustBeSpecified", Some(400)),
];

/// Server error codes
pub const SERVER_ERROR_CODES: &[(&str, Option<u16>)] = &[
    ("InternalError", Some(500)),
    ("NotImplemented", Some(501)),
    ("ServiceUnavailable", Some(503)),
    ("SlowDown", Some(503)),
];

static S3_ERROR_CODES: Lazy<MatcherNode> = Lazy::new(|| {
    build_s3_error_codes().expect("S3 error code table must not contain duplicate codes")
});

/// Build the S3 error code tree: a generic root with `client` and `server`
/// subtrees.
pub fn build_s3_error_codes() -> Result<MatcherNode> {
    let mut root = MatcherNode::root(MatcherKind::Generic);

    let server = root.attach(MatcherNode::named("server", MatcherKind::Server))?;
    build(server, SERVER_ERROR_CODES.iter().copied(), MatcherKind::Server)?;

    let client = root.attach(MatcherNode::named("client", MatcherKind::Client))?;
    build(client, CLIENT_ERROR_CODES.iter().copied(), MatcherKind::Client)?;

    Ok(root)
}

/// Shared, read-only S3 error code tree
pub fn s3_error_codes() -> &'static MatcherNode {
    &S3_ERROR_CODES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServerError;

    #[test]
    fn test_catalogue_shape() {
        let root = s3_error_codes();

        assert_eq!(root.child("client").unwrap().leaves().len(), CLIENT_ERROR_CODES.len());
        assert_eq!(root.child("server").unwrap().leaves().len(), SERVER_ERROR_CODES.len());
        assert_eq!(root.leaves().len(), CLIENT_ERROR_CODES.len() + SERVER_ERROR_CODES.len());
    }

    #[test]
    fn test_catalogue_leaf_statuses() {
        let root = s3_error_codes();

        assert_eq!(root.lookup("client.NoSuchBucket").unwrap().status_pattern().as_str(), "404");
        assert_eq!(root.lookup("client.InvalidRange").unwrap().status_pattern().as_str(), "416");
        assert_eq!(root.lookup("server.SlowDown").unwrap().status_pattern().as_str(), "503");
        assert_eq!(
            root.lookup("client.MissingAttachment").unwrap().status_pattern().as_str(),
            r"4\d\d"
        );
    }

    #[test]
    fn test_catalogue_matching() {
        let root = s3_error_codes();
        let no_such_bucket = ServerError::new(404, "NoSuchBucket");
        let unregistered = ServerError::new(403, "AnythingUnregistered");

        assert!(root.lookup("client.NoSuchBucket").unwrap().matches(&no_such_bucket));
        assert!(!root.lookup("client.BucketAlreadyExists").unwrap().matches(&no_such_bucket));
        assert!(root.lookup("client").unwrap().matches(&unregistered));
        assert!(!root.lookup("server").unwrap().matches(&unregistered));
        assert!(root.matches(&unregistered));
    }

    #[test]
    fn test_fresh_build_equals_shared() {
        let fresh = build_s3_error_codes().unwrap();
        let fresh_paths: Vec<&str> = fresh.leaves().iter().map(|n| n.path()).collect();
        let shared_paths: Vec<&str> = s3_error_codes().leaves().iter().map(|n| n.path()).collect();
        assert_eq!(fresh_paths, shared_paths);
    }
}
