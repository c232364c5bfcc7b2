//! Response relay.
//!
//! # Responsibilities
//! - Mirror the upstream status code
//! - Re-emit JSON bodies as JSON, everything else byte-for-byte
//! - Preserve the upstream content-type
//!
//! # Design Decisions
//! - Error bodies that are not JSON are relayed as raw text
//! - An empty JSON success body relays as an empty body rather than failing

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::proxy::error::ProxyError;
use crate::proxy::forwarder::UpstreamResponse;

/// Turn a buffered upstream reply into the caller's response.
pub fn relay(upstream: UpstreamResponse) -> Result<Response, ProxyError> {
    let UpstreamResponse {
        status,
        content_type,
        body,
    } = upstream;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body).into_owned();
        if let Ok(json) = serde_json::from_str::<Value>(&text) {
            return Ok((status, Json(json)).into_response());
        }
        let content_type =
            content_type.unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
        return Ok((status, [(header::CONTENT_TYPE, content_type)], text).into_response());
    }

    let is_json = content_type
        .as_ref()
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(with_content_type(status, content_type, Body::empty()));
        }
        let json: Value = serde_json::from_slice(&body)?;
        return Ok((status, Json(json)).into_response());
    }

    Ok(with_content_type(status, content_type, Body::from(body)))
}

fn with_content_type(status: StatusCode, content_type: Option<HeaderValue>, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Some(ct) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    response
}
