//! Proxy error taxonomy and its HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::session::SessionError;

/// Everything that can stop a request from being relayed.
///
/// Upstream non-2xx replies are not errors: they are relayed as-is.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Catch-all path missing or empty.
    #[error("Invalid path")]
    InvalidPath,

    #[error("upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("credential resolution failed: {0}")]
    Credential(#[from] SessionError),

    /// Inbound body over `proxy.max_body_bytes`, or cut off while reading.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`ProxyError`] bound to the route-level context it is reported with.
#[derive(Debug)]
pub struct ProxyFailure {
    /// Fixed, route-specific summary.
    pub error: &'static str,
    pub cause: ProxyError,
    /// Joined upstream path, when one was formed.
    pub path: Option<String>,
}

impl ProxyFailure {
    pub fn new(error: &'static str, cause: ProxyError, path: Option<String>) -> Self {
        Self { error, cause, path }
    }

    pub fn status(&self) -> StatusCode {
        match self.cause {
            ProxyError::InvalidPath => StatusCode::BAD_REQUEST,
            ProxyError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        if let ProxyError::InvalidPath = self.cause {
            return json!({ "error": self.cause.to_string() });
        }

        let mut body = json!({
            "error": self.error,
            "message": self.cause.to_string(),
        });
        if let Some(path) = &self.path {
            body["path"] = Value::String(path.clone());
        }
        body
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
