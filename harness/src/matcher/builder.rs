use super::node::{join_path, MatcherKind, MatcherNode, Pattern};
use crate::error::{HarnessError, Result};
use std::collections::btree_map::Entry;

/// An error code to register, optionally with the status it must come with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDefinition {
    /// Dotted error code, e.g. `InvalidKeyPair.Duplicate`
    pub code: String,
    /// Status pattern for the leaf; the base kind's default when absent
    pub status: Option<String>,
}

impl CodeDefinition {
    pub fn new<S: Into<String>>(code: S) -> Self {
        Self {
            code: code.into(),
            status: None,
        }
    }

    pub fn with_status<S: Into<String>>(code: S, status: impl ToString) -> Self {
        Self {
            code: code.into(),
            status: Some(status.to_string()),
        }
    }
}

impl From<&str> for CodeDefinition {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CodeDefinition {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<(&str, u16)> for CodeDefinition {
    fn from((code, status): (&str, u16)) -> Self {
        Self::with_status(code, status)
    }
}

impl From<(&str, &str)> for CodeDefinition {
    fn from((code, status): (&str, &str)) -> Self {
        Self::with_status(code, status)
    }
}

impl From<(&str, Option<u16>)> for CodeDefinition {
    fn from((code, status): (&str, Option<u16>)) -> Self {
        Self {
            code: code.to_string(),
            status: status.map(|s| s.to_string()),
        }
    }
}

/// Register `definitions` below `root`.
///
/// Every segment but the last becomes an interior node whose code pattern
/// accepts anything under its prefix; the last segment becomes a leaf
/// matching the full code. Code patterns are relative to `root`.
pub fn build<I, D>(root: &mut MatcherNode, definitions: I, base: MatcherKind) -> Result<()>
where
    I: IntoIterator<Item = D>,
    D: Into<CodeDefinition>,
{
    for definition in definitions {
        add_definition(root, &definition.into(), base)?;
    }
    Ok(())
}

fn add_definition(root: &mut MatcherNode, definition: &CodeDefinition, base: MatcherKind) -> Result<()> {
    let parts: Vec<&str> = definition.code.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(HarnessError::AmbiguousErrorCode {
            code: definition.code.clone(),
            reason: "empty path segment".to_string(),
        });
    }

    let max_index = parts.len() - 1;
    let mut base_match = String::new();
    let mut node = root;

    for (index, part) in parts.iter().enumerate() {
        let leaf = index == max_index;
        let escaped = regex::escape(part);
        let code_source = if leaf {
            format!("{}{}", base_match, escaped)
        } else {
            format!("{}{}[.].*", base_match, escaped)
        };
        base_match.push_str(&escaped);
        base_match.push_str("[.]");

        let child_path = join_path(node.path(), part);

        node = match node.children.entry(part.to_string()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                if leaf {
                    return Err(if existing.is_leaf() {
                        HarnessError::DuplicateErrorCode { code: child_path }
                    } else {
                        HarnessError::AmbiguousErrorCode {
                            code: definition.code.clone(),
                            reason: format!("\"{}\" is already an error code prefix", child_path),
                        }
                    });
                }
                if existing.is_leaf() {
                    return Err(HarnessError::AmbiguousErrorCode {
                        code: definition.code.clone(),
                        reason: format!("\"{}\" is already a registered error code", child_path),
                    });
                }
                existing
            }
            Entry::Vacant(entry) => {
                let status_source = match (&definition.status, leaf) {
                    (Some(status), true) => status.clone(),
                    _ => base.default_status_pattern().to_string(),
                };
                let status_pattern = compile(&definition.code, status_source)?;
                let code_pattern = compile(&definition.code, code_source)?;
                entry.insert(MatcherNode::new(
                    part.to_string(),
                    child_path,
                    base,
                    status_pattern,
                    code_pattern,
                    leaf,
                ))
            }
        };
    }

    Ok(())
}

fn compile(code: &str, source: String) -> Result<Pattern> {
    Pattern::new(source.clone()).map_err(|source_err| HarnessError::InvalidErrorPattern {
        code: code.to_string(),
        pattern: source,
        source: source_err,
    })
}
