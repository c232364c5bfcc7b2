//! Bearer credential resolution for outbound API calls.

use axum::http::{HeaderMap, HeaderValue};

use crate::session::cookies::cookie_value;
use crate::session::resolver::{SessionError, SessionResolver};

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Session,
    LegacyCookie,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Session => "session",
            CredentialSource::LegacyCookie => "legacy_cookie",
        }
    }
}

/// A bearer token to attach to an upstream request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

impl Credential {
    pub fn new(token: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// `Authorization` header value (`Bearer <token>`).
    ///
    /// `None` if the token contains bytes not allowed in a header.
    pub fn header_value(&self) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

/// Pick the caller's bearer token: the session access token first, then the
/// legacy token cookie.
pub async fn resolve_credential(
    resolver: &dyn SessionResolver,
    headers: &HeaderMap,
    legacy_cookie: &str,
) -> Result<Option<Credential>, SessionError> {
    let session_token = resolver
        .resolve(headers)
        .await?
        .and_then(|s| s.access_token)
        .filter(|t| !t.is_empty());

    if let Some(token) = session_token {
        return Ok(Some(Credential::new(token, CredentialSource::Session)));
    }

    Ok(cookie_value(headers, legacy_cookie)
        .map(|token| Credential::new(token, CredentialSource::LegacyCookie)))
}
