//! Path prefix matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix match on the raw string, so "/plans" also covers "/plans-pro"
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// A set of prefixes combined with OR semantics.
#[derive(Debug, Clone, Default)]
pub struct PrefixSet {
    matchers: Vec<PathPrefixMatcher>,
}

impl PrefixSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// First prefix that matches `path`.
    pub fn find(&self, path: &str) -> Option<&PathPrefixMatcher> {
        self.matchers.iter().find(|m| m.matches(path))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
