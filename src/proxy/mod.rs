//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! ANY /api/backend/{*path}
//!     → backend.rs (split segments, 400 on empty path)
//!     → session (resolve bearer credential)
//!     → descriptor.rs (target URL, header rewrite, body re-encode)
//!     → forwarder.rs (single outbound call under the shared timeout)
//!     → relay.rs (status, content-type, JSON or raw bytes)
//!     → error.rs (any failure → 500 {error, message, path})
//!
//! GET /api/blog/posts[/{slug}]
//!     → blog.rs → forwarder.rs → relay.rs
//! ```
//!
//! # Design Decisions
//! - Stateless per request: no caching, no retries, one response write
//! - Same timeout for every proxy entry point
//! - Upstream non-2xx is relayed, not treated as a gateway failure

pub mod backend;
pub mod blog;
pub mod descriptor;
pub mod error;
pub mod forwarder;
pub mod relay;

use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::session::SessionResolver;

pub use backend::{backend_proxy_handler, BACKEND_PREFIX};
pub use blog::{blog_proxy_handler, BLOG_PREFIX};
pub use error::{ProxyError, ProxyFailure};
pub use forwarder::{Forwarder, UpstreamResponse};

/// Shared state for the proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    pub forwarder: Forwarder,
    pub resolver: Arc<dyn SessionResolver>,
    pub api_origin: Arc<str>,
    pub blog_origin: Arc<str>,
    pub session_cookie: Arc<str>,
    pub legacy_cookie: Arc<str>,
    pub max_body_bytes: usize,
}

impl ProxyState {
    pub fn from_config(config: &GatewayConfig, resolver: Arc<dyn SessionResolver>) -> Result<Self, ProxyError> {
        let forwarder = Forwarder::new(Duration::from_secs(config.upstream.timeout_secs))?;
        Ok(Self {
            forwarder,
            resolver,
            api_origin: Arc::from(config.upstream.api_url.as_str()),
            blog_origin: Arc::from(config.upstream.blog_origin()),
            session_cookie: Arc::from(config.session.cookie_name.as_str()),
            legacy_cookie: Arc::from(config.session.legacy_cookie_name.as_str()),
            max_body_bytes: config.proxy.max_body_bytes,
        })
    }
}
