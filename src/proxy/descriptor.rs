//! Proxied request descriptor.
//!
//! # Responsibilities
//! - Split the catch-all path into segments
//! - Build the upstream target URL
//! - Rewrite headers (strip host/hop-by-hop, swap cookies for Authorization)
//! - Re-encode mutating request bodies
//!
//! # Design Decisions
//! - Segments keep their original percent-encoding; they are never decoded
//! - The query string is appended verbatim
//! - At most one Authorization header leaves the gateway

use axum::http::{header, HeaderMap, HeaderName, Method};
use bytes::Bytes;
use serde_json::Value;

use crate::proxy::error::ProxyError;
use crate::session::cookies::without_cookies;
use crate::session::Credential;

/// Inbound headers never forwarded as-is.
///
/// `content-length` is recomputed for the re-encoded body and
/// `accept-encoding` is dropped so the upstream answers uncompressed.
static DROPPED_HEADERS: [HeaderName; 10] = [
    header::HOST,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::CONTENT_LENGTH,
    header::ACCEPT_ENCODING,
    header::AUTHORIZATION,
    header::COOKIE,
];

/// Split `path` below `prefix` into its non-empty segments.
///
/// `/api/backend/users/42` with prefix `/api/backend` gives `["users", "42"]`.
pub fn segments_from_path(path: &str, prefix: &str) -> Result<Vec<String>, ProxyError> {
    let rest = path.strip_prefix(prefix).ok_or(ProxyError::InvalidPath)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return Err(ProxyError::InvalidPath);
    }

    let segments: Vec<String> = rest
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if segments.is_empty() {
        return Err(ProxyError::InvalidPath);
    }
    Ok(segments)
}

/// `<origin>/<path>[?<query>]`.
pub fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!("{}/{}", origin.trim_end_matches('/'), path);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }
    url
}

/// Copy inbound headers for the upstream request.
///
/// `hidden_cookies` are removed from the `Cookie` header; the credential, if
/// any, becomes the only `Authorization` header.
pub fn forwarded_headers(
    inbound: &HeaderMap,
    hidden_cookies: &[&str],
    credential: Option<&Credential>,
) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if DROPPED_HEADERS.contains(name) || matches!(name.as_str(), "keep-alive" | "proxy-connection") {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    if let Some(cookie) = without_cookies(inbound, hidden_cookies) {
        headers.insert(header::COOKIE, cookie);
    }

    if let Some(value) = credential.and_then(Credential::header_value) {
        headers.insert(header::AUTHORIZATION, value);
    }
    headers
}

/// Methods whose body is forwarded.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// A request body prepared for forwarding.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    /// Parsed JSON, re-encoded as JSON text.
    Json(Value),
    /// Text, forwarded unchanged.
    Text(String),
    /// Anything else, forwarded unchanged.
    Binary(Bytes),
}

impl ForwardBody {
    /// Classify an inbound body. Empty bodies are not forwarded.
    pub fn from_bytes(bytes: Bytes, content_type: Option<&str>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        let is_json = content_type.is_some_and(|ct| ct.contains("json"));
        if is_json {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                return Some(ForwardBody::Json(value));
            }
        }

        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Some(ForwardBody::Text(text)),
            Err(_) => Some(ForwardBody::Binary(bytes)),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, ProxyError> {
        Ok(match self {
            ForwardBody::Json(value) => Bytes::from(serde_json::to_vec(&value)?),
            ForwardBody::Text(text) => Bytes::from(text),
            ForwardBody::Binary(bytes) => bytes,
        })
    }
}

/// Ephemeral record of one proxied call.
#[derive(Debug)]
pub struct ProxiedRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<ForwardBody>,
}

impl ProxiedRequest {
    /// Segments joined with '/'.
    pub fn joined_path(&self) -> String {
        self.segments.join("/")
    }

    pub fn target_url(&self, origin: &str) -> String {
        upstream_url(origin, &self.joined_path(), self.query.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CredentialSource;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_segments_from_path() {
        assert_eq!(
            segments_from_path("/api/backend/users/42", "/api/backend").unwrap(),
            vec!["users", "42"]
        );
        assert_eq!(
            segments_from_path("/api/backend/files/a%20b//c/", "/api/backend").unwrap(),
            vec!["files", "a%20b", "c"]
        );
    }

    #[test]
    fn test_empty_segments_are_invalid() {
        for path in ["/api/backend", "/api/backend/", "/api/backend//", "/api/backendx/users"] {
            assert!(
                matches!(segments_from_path(path, "/api/backend"), Err(ProxyError::InvalidPath)),
                "{path} should be invalid"
            );
        }
    }

    #[test]
    fn test_target_url() {
        let request = ProxiedRequest {
            method: Method::GET,
            segments: vec!["users".into(), "42".into()],
            query: Some("foo=bar".into()),
            headers: HeaderMap::new(),
            body: None,
        };
        assert_eq!(request.target_url("https://api.example.com"), "https://api.example.com/users/42?foo=bar");
        assert_eq!(request.target_url("https://api.example.com/"), "https://api.example.com/users/42?foo=bar");
        assert_eq!(upstream_url("http://up", "a", Some("")), "http://up/a");
        assert_eq!(upstream_url("http://up/v1", "a/b", None), "http://up/v1/a/b");
    }

    #[test]
    fn test_forwarded_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::HOST, HeaderValue::from_static("gateway.local"));
        inbound.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        inbound.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        inbound.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer spoofed"));
        inbound.insert("x-request-id", HeaderValue::from_static("rid-1"));
        inbound.insert(
            header::COOKIE,
            HeaderValue::from_static("session-token=abc; theme=dark; auth_token=old"),
        );

        let credential = Credential::new("fresh", CredentialSource::Session);
        let headers = forwarded_headers(&inbound, &["session-token", "auth_token"], Some(&credential));

        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get("x-request-id").unwrap(), "rid-1");
        assert_eq!(headers.get(header::COOKIE).unwrap(), "theme=dark");
        assert_eq!(headers.get_all(header::AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer fresh");
    }

    #[test]
    fn test_forwarded_headers_without_credential_drop_authorization() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer spoofed"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("auth_token=old"));

        let headers = forwarded_headers(&inbound, &["session-token", "auth_token"], None);
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert!(headers.get(header::COOKIE).is_none());
    }

    #[test]
    fn test_forward_body_classification() {
        let json_body = ForwardBody::from_bytes(Bytes::from_static(br#"{ "a" : 1 }"#), Some("application/json"));
        assert_eq!(json_body, Some(ForwardBody::Json(json!({ "a": 1 }))));
        assert_eq!(json_body.unwrap().into_bytes().unwrap(), Bytes::from_static(br#"{"a":1}"#));

        let text = ForwardBody::from_bytes(Bytes::from_static(b"a=1&b=2"), Some("application/x-www-form-urlencoded"));
        assert_eq!(text.unwrap().into_bytes().unwrap(), Bytes::from_static(b"a=1&b=2"));

        let broken_json = ForwardBody::from_bytes(Bytes::from_static(b"{oops"), Some("application/json"));
        assert_eq!(broken_json, Some(ForwardBody::Text("{oops".into())));

        let binary = ForwardBody::from_bytes(Bytes::from_static(&[0xff, 0x00, 0xfe]), None);
        assert!(matches!(binary, Some(ForwardBody::Binary(_))));

        assert_eq!(ForwardBody::from_bytes(Bytes::new(), Some("application/json")), None);
    }

    #[test]
    fn test_carries_body() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PUT));
        assert!(carries_body(&Method::PATCH));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::DELETE));
    }
}
