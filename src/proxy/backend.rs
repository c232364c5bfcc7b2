//! Authenticated catch-all proxy to the backend API.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::observability::metrics;
use crate::proxy::descriptor::{carries_body, forwarded_headers, segments_from_path, ForwardBody, ProxiedRequest};
use crate::proxy::error::{ProxyError, ProxyFailure};
use crate::proxy::relay::relay;
use crate::proxy::ProxyState;
use crate::session::resolve_credential;

/// Mount point of the catch-all route.
pub const BACKEND_PREFIX: &str = "/api/backend";

const FAILURE_MESSAGE: &str = "Failed to proxy request";

/// `ANY /api/backend/{*path}`.
pub async fn backend_proxy_handler(State(state): State<ProxyState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request_id(request.headers()).to_string();

    let segments = match segments_from_path(request.uri().path(), BACKEND_PREFIX) {
        Ok(segments) => segments,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %request.uri().path(), "Rejected empty backend path");
            let failure = ProxyFailure::new(FAILURE_MESSAGE, e, None);
            metrics::record_proxy_request("backend", method.as_str(), failure.status().as_u16(), start_time);
            return failure.into_response();
        }
    };
    let joined = segments.join("/");

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %joined,
        "Proxying backend request"
    );

    match forward(&state, request, segments).await {
        Ok(response) => {
            metrics::record_proxy_request("backend", method.as_str(), response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, method = %method, path = %joined, error = %e, "Backend proxy failed");
            if let ProxyError::Credential(_) = e {
                metrics::record_session_error("proxy");
            }
            let failure = ProxyFailure::new(FAILURE_MESSAGE, e, Some(joined));
            metrics::record_proxy_request("backend", method.as_str(), failure.status().as_u16(), start_time);
            failure.into_response()
        }
    }
}

async fn forward(state: &ProxyState, request: Request<Body>, segments: Vec<String>) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let declared_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if carries_body(&parts.method) && declared_length.is_some_and(|len| len > state.max_body_bytes) {
        return Err(ProxyError::BodyTooLarge(state.max_body_bytes));
    }

    let credential = resolve_credential(state.resolver.as_ref(), &parts.headers, &state.legacy_cookie).await?;
    if let Some(credential) = &credential {
        tracing::debug!(source = credential.source().as_str(), "Attaching bearer credential");
    }

    let hidden = [&*state.session_cookie, &*state.legacy_cookie];
    let headers = forwarded_headers(&parts.headers, &hidden, credential.as_ref());

    let body = if carries_body(&parts.method) {
        let bytes = axum::body::to_bytes(body, state.max_body_bytes)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Inbound body read stopped");
                ProxyError::BodyTooLarge(state.max_body_bytes)
            })?;
        let content_type = parts.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
        ForwardBody::from_bytes(bytes, content_type)
    } else {
        None
    };

    let descriptor = ProxiedRequest {
        method: parts.method,
        segments,
        query: parts.uri.query().map(String::from),
        headers,
        body,
    };

    let url = descriptor.target_url(&state.api_origin);
    let body = descriptor.body.map(ForwardBody::into_bytes).transpose()?;

    let upstream = state
        .forwarder
        .send(descriptor.method, &url, descriptor.headers, body)
        .await?;

    tracing::debug!(status = %upstream.status, url = %url, "Upstream responded");
    relay(upstream)
}
