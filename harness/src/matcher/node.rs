use crate::error::{HarnessError, Result};
use crate::types::ServerError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Default code pattern: any error code
pub const ANY_CODE_PATTERN: &str = ".*";

/// Family of errors a matcher accepts before any leaf narrows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// Any 4xx or 5xx status
    Generic,
    /// Any 4xx status
    Client,
    /// Any 5xx status
    Server,
}

impl MatcherKind {
    pub fn default_status_pattern(&self) -> &'static str {
        match self {
            MatcherKind::Generic => r"[45]\d\d",
            MatcherKind::Client => r"4\d\d",
            MatcherKind::Server => r"5\d\d",
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherKind::Generic => write!(f, "generic"),
            MatcherKind::Client => write!(f, "client"),
            MatcherKind::Server => write!(f, "server"),
        }
    }
}

/// A regular expression matched from the start of the text only.
///
/// A pattern like `NoSuchKey` also accepts `NoSuchKeyVersion`; anchor with
/// `$` where an exact match is required.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new<S: Into<String>>(source: S) -> std::result::Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One node of the error classifier tree.
///
/// Interior nodes accept any error code below their prefix, leaf nodes accept
/// one error code. Children are addressed by path segment.
#[derive(Debug, Clone)]
pub struct MatcherNode {
    name: String,
    path: String,
    kind: MatcherKind,
    status_pattern: Pattern,
    code_pattern: Pattern,
    leaf: bool,
    pub(crate) children: BTreeMap<String, MatcherNode>,
}

impl MatcherNode {
    /// Sentinel root accepting anything of `kind`
    pub fn root(kind: MatcherKind) -> Self {
        Self::named("", kind)
    }

    /// Node with `kind`'s default patterns, to be attached below a root
    pub fn named<S: Into<String>>(name: S, kind: MatcherKind) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            kind,
            status_pattern: default_pattern(kind.default_status_pattern()),
            code_pattern: default_pattern(ANY_CODE_PATTERN),
            leaf: false,
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn new(
        name: String,
        path: String,
        kind: MatcherKind,
        status_pattern: Pattern,
        code_pattern: Pattern,
        leaf: bool,
    ) -> Self {
        Self {
            name,
            path,
            kind,
            status_pattern,
            code_pattern,
            leaf,
            children: BTreeMap::new(),
        }
    }

    /// Attach `child` under its name, rejecting a second node with the same name
    pub fn attach(&mut self, mut child: MatcherNode) -> Result<&mut MatcherNode> {
        let path = join_path(&self.path, &child.name);
        if self.children.contains_key(&child.name) {
            return Err(HarnessError::DuplicateErrorCode { code: path });
        }
        child.rebase(&self.path);
        let name = child.name.clone();
        Ok(self.children.entry(name).or_insert(child))
    }

    fn rebase(&mut self, parent_path: &str) {
        self.path = join_path(parent_path, &self.name);
        let path = self.path.clone();
        for child in self.children.values_mut() {
            child.rebase(&path);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root, e.g. `client.NoSuchBucket`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    pub fn status_pattern(&self) -> &Pattern {
        &self.status_pattern
    }

    pub fn code_pattern(&self) -> &Pattern {
        &self.code_pattern
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn child(&self, segment: &str) -> Option<&MatcherNode> {
        self.children.get(segment)
    }

    pub fn child_mut(&mut self, segment: &str) -> Option<&mut MatcherNode> {
        self.children.get_mut(segment)
    }

    pub fn children(&self) -> impl Iterator<Item = &MatcherNode> {
        self.children.values()
    }

    /// Resolve a dotted path relative to this node
    pub fn get(&self, path: &str) -> Option<&MatcherNode> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Like [`MatcherNode::get`] but reports unknown paths as an error
    pub fn lookup(&self, path: &str) -> Result<&MatcherNode> {
        self.get(path).ok_or_else(|| HarnessError::UnknownErrorCode {
            path: path.to_string(),
        })
    }

    /// All leaves below this node, depth first in name order
    pub fn leaves(&self) -> Vec<&MatcherNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a MatcherNode>) {
        if self.leaf {
            leaves.push(self);
        }
        for child in self.children.values() {
            child.collect_leaves(leaves);
        }
    }

    /// Whether `error` carries a status and code this node accepts
    pub fn matches(&self, error: &ServerError) -> bool {
        self.check_server(error).is_none()
    }

    /// Check an observed error.
    ///
    /// Returns `None` when it matches, otherwise a diagnostic describing the
    /// mismatch. Errors that are not server errors never match.
    pub fn check(&self, error: &HarnessError) -> Option<String> {
        match error.as_server_error() {
            Some(server_error) => self.check_server(server_error),
            None => Some(format!("{} is not a server error", error)),
        }
    }

    /// Check an observed server error, see [`MatcherNode::check`]
    pub fn check_server(&self, error: &ServerError) -> Option<String> {
        info!("Status: {} , error_code: {}", error.status, error.error_code);

        if !self.status_pattern.is_match(&error.status.to_string()) {
            return Some(format!(
                "Status code ({}) does not match the expected re pattern \"{}\"",
                error.status, self.status_pattern
            ));
        }

        if !self.code_pattern.is_match(&error.error_code) {
            return Some(format!(
                "Error code ({}) does not match the expected re pattern \"{}\"",
                error.error_code, self.code_pattern
            ));
        }

        None
    }
}

pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

fn default_pattern(source: &'static str) -> Pattern {
    Pattern::new(source).expect("built-in matcher patterns are valid")
}
