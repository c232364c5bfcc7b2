//! Blog listing proxy.
//! Unauthenticated, read-only pass-through to the blog service.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::proxy::descriptor::{segments_from_path, upstream_url};
use crate::proxy::error::{ProxyError, ProxyFailure};
use crate::proxy::relay::relay;
use crate::proxy::ProxyState;

pub const BLOG_PREFIX: &str = "/api/blog";

const FAILURE_MESSAGE: &str = "Failed to fetch blog posts";

/// `GET /api/blog/posts` and `GET /api/blog/posts/{slug}`.
pub async fn blog_proxy_handler(State(state): State<ProxyState>, uri: Uri, headers: HeaderMap) -> Response {
    let start_time = Instant::now();

    let response = match fetch(&state, &uri, &headers).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(path = %uri.path(), error = %e, "Blog proxy failed");
            ProxyFailure::new(FAILURE_MESSAGE, e, None).into_response()
        }
    };
    metrics::record_proxy_request("blog", "GET", response.status().as_u16(), start_time);
    response
}

async fn fetch(state: &ProxyState, uri: &Uri, inbound: &HeaderMap) -> Result<Response, ProxyError> {
    let path = segments_from_path(uri.path(), BLOG_PREFIX)?.join("/");
    let url = upstream_url(&state.blog_origin, &path, uri.query());

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(id) = inbound.get("x-request-id") {
        headers.insert("x-request-id", id.clone());
    }

    tracing::debug!(url = %url, "Fetching blog posts");
    let upstream = state.forwarder.send(Method::GET, &url, headers, None).await?;
    relay(upstream)
}
