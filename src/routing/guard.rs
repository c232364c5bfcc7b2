//! Route Guard decisions.
//!
//! # Responsibilities
//! - Classify a path as protected, auth-entry or public
//! - Decide redirect-vs-proceed from the class and session presence
//! - Sanitize the post-login callback target

use url::form_urlencoded;

use crate::config::GuardConfig;
use crate::routing::matcher::PrefixSet;

/// Static classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a session.
    Protected,
    /// Login/register pages; signed-in users are sent away.
    AuthEntry,
    Public,
}

/// Why the guard redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Unauthenticated,
    AlreadySignedIn,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::Unauthenticated => "unauthenticated",
            RedirectReason::AlreadySignedIn => "already_signed_in",
        }
    }
}

/// Outcome of guarding a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect {
        location: String,
        reason: RedirectReason,
    },
}

/// Immutable guard built from configuration at startup.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected: PrefixSet,
    auth_entry: PrefixSet,
    login_path: String,
    callback_param: String,
}

impl RouteGuard {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            protected: PrefixSet::new(config.protected_prefixes.iter().cloned()),
            auth_entry: PrefixSet::new(config.auth_entry_prefixes.iter().cloned()),
            login_path: config.login_path.clone(),
            callback_param: config.callback_param.clone(),
        }
    }

    /// Classify `path`. Protected prefixes are checked first.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.matches(path) {
            RouteClass::Protected
        } else if self.auth_entry.matches(path) {
            RouteClass::AuthEntry
        } else {
            RouteClass::Public
        }
    }

    /// Decide what to do with a request for `path` (with its raw `query`).
    pub fn decide(&self, path: &str, query: Option<&str>, authenticated: bool) -> GuardDecision {
        match (self.classify(path), authenticated) {
            (RouteClass::Protected, false) => GuardDecision::Redirect {
                location: self.login_redirect(path),
                reason: RedirectReason::Unauthenticated,
            },
            (RouteClass::AuthEntry, true) => GuardDecision::Redirect {
                location: self.callback_target(query),
                reason: RedirectReason::AlreadySignedIn,
            },
            _ => GuardDecision::Proceed,
        }
    }

    /// `<login path>?<callback param>=<path>`, with the path form-encoded.
    pub fn login_redirect(&self, path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.callback_param, path)
            .finish();
        format!("{}?{}", self.login_path, query)
    }

    /// Where a signed-in visitor of an auth-entry page should go.
    pub fn callback_target(&self, query: Option<&str>) -> String {
        query
            .and_then(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .find(|(k, _)| k == self.callback_param.as_str())
                    .map(|(_, v)| v.into_owned())
            })
            .filter(|target| is_relative_path(target))
            .unwrap_or_else(|| "/".to_string())
    }
}

/// Same-origin relative path: starts with '/' but is not protocol-relative.
pub fn is_relative_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}
