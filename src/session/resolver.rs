//! Session resolution from the signed session cookie.
//!
//! The cookie value is `<payload>.<signature>` where `payload` is the
//! base64url (unpadded) JSON encoding of [`Session`] and `signature` is the
//! base64url HMAC-SHA256 of the payload text keyed by the session secret.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::session::cookies::cookie_value;

type HmacSha256 = Hmac<Sha256>;

/// An authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier of the signed-in user.
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Bearer token for the backend API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Expiry timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl Session {
    /// Check whether the session is still valid at `now` (seconds since epoch).
    pub fn is_active_at(&self, now: u64) -> bool {
        self.expires_at.map_or(true, |exp| exp > now)
    }
}

/// Errors raised while resolving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Payload carried a valid signature but could not be decoded.
    #[error("session payload is corrupt: {0}")]
    Corrupt(String),

    /// Signing key rejected by the MAC implementation.
    #[error("invalid session key: {0}")]
    Key(String),

    /// The session store could not be reached.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the caller's session from request headers.
///
/// `Ok(None)` means "no usable session"; `Err` means resolution itself
/// failed and the caller decides how to degrade.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

/// Verifies and decodes the HMAC-signed session cookie.
#[derive(Clone)]
pub struct SignedCookieResolver {
    secret: Vec<u8>,
    cookie_name: String,
}

impl SignedCookieResolver {
    pub fn new(secret: impl AsRef<[u8]>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            cookie_name: cookie_name.into(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| SessionError::Key(e.to_string()))
    }

    /// Produce a signed cookie value for `session`.
    pub fn sign(&self, session: &Session) -> Result<String, SessionError> {
        let json = serde_json::to_vec(session).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify and decode a cookie value.
    ///
    /// Tampered, malformed or expired values yield `Ok(None)`.
    pub fn decode(&self, value: &str, now: u64) -> Result<Option<Session>, SessionError> {
        let Some((payload, signature)) = value.split_once('.') else {
            tracing::debug!("Session cookie is not in payload.signature form");
            return Ok(None);
        };

        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
            tracing::debug!("Session cookie signature is not base64url");
            return Ok(None);
        };

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            tracing::debug!("Session cookie signature mismatch");
            return Ok(None);
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        let session: Session =
            serde_json::from_slice(&json).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        if !session.is_active_at(now) {
            tracing::debug!(user_id = %session.user_id, "Session expired");
            return Ok(None);
        }
        Ok(Some(session))
    }
}

#[async_trait]
impl SessionResolver for SignedCookieResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        match cookie_value(headers, &self.cookie_name) {
            Some(value) => self.decode(&value, unix_now()),
            None => Ok(None),
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
