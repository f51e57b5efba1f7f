//! Assertion helpers returning [`HarnessError::Assertion`] instead of panicking

use crate::error::{HarnessError, Result};
use crate::matcher::MatcherNode;
use regex::Regex;

/// Run `operation` and require it to fail with a server error accepted by `matcher`.
///
/// Errors that are not server errors are returned unchanged.
pub fn assert_server_error<T, F>(matcher: &MatcherNode, operation: F) -> Result<()>
where
    F: FnOnce() -> Result<T>,
{
    match operation() {
        Ok(_) => Err(HarnessError::assertion("Server error not raised")),
        Err(error @ HarnessError::Server(_)) => match matcher.check(&error) {
            Some(diagnostic) => Err(HarnessError::assertion(diagnostic)),
            None => Ok(()),
        },
        Err(other) => Err(other),
    }
}

/// Require `pattern` to occur somewhere in `text`
pub fn assert_re_search(pattern: &str, text: &str) -> Result<()> {
    if Regex::new(pattern)?.is_match(text) {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "regexp: '{}' not found in '{}'",
            pattern, text
        )))
    }
}

/// Require `pattern` not to occur anywhere in `text`
pub fn assert_not_re_search(pattern: &str, text: &str) -> Result<()> {
    if Regex::new(pattern)?.is_match(text) {
        Err(HarnessError::assertion(format!(
            "regexp: '{}' found in '{}'",
            pattern, text
        )))
    } else {
        Ok(())
    }
}

/// Require `pattern` to match at the start of `text`
pub fn assert_re_match(pattern: &str, text: &str) -> Result<()> {
    if anchored(pattern)?.is_match(text) {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "regexp: '{}' not matches on '{}'",
            pattern, text
        )))
    }
}

/// Require `pattern` not to match at the start of `text`
pub fn assert_not_re_match(pattern: &str, text: &str) -> Result<()> {
    if anchored(pattern)?.is_match(text) {
        Err(HarnessError::assertion(format!(
            "regexp: '{}' matches on '{}'",
            pattern, text
        )))
    } else {
        Ok(())
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})", pattern))?)
}
