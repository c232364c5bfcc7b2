//! Outbound HTTP client.
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pooling across requests)
//! - Every call has a deadline covering send and full body read
//! - Never retries; the caller owns retry policy

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use bytes::Bytes;

use crate::proxy::error::ProxyError;

/// A fully buffered upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Sends requests to upstream origins under a uniform timeout.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Issue one request and buffer the reply.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            Ok::<_, ProxyError>(UpstreamResponse {
                status,
                content_type,
                body,
            })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ProxyError::Timeout(self.timeout.as_secs())),
        }
    }
}
