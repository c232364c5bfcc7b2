//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (Route Guard, tracing, timeout, request ID)
//! - Bind server to listener
//! - Serve pre-rendered pages behind the guard

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get, post},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::chat::{chat_handler, CannedResponder, ChatState, ResponseProvider};
use crate::config::GatewayConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::proxy::{backend_proxy_handler, blog_proxy_handler, ProxyError, ProxyState};
use crate::routing::{route_guard_middleware, GuardState, RouteGuard};
use crate::session::{SessionResolver, SignedCookieResolver};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] ProxyError),
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server with the signed-cookie session resolver and the
    /// canned chat responder.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let resolver: Arc<dyn SessionResolver> = Arc::new(SignedCookieResolver::new(
            &config.session.secret,
            config.session.cookie_name.clone(),
        ));
        let provider: Arc<dyn ResponseProvider> = Arc::new(CannedResponder::new(
            Duration::from_millis(config.chat.min_delay_ms),
            Duration::from_millis(config.chat.max_delay_ms),
        ));
        Self::with_collaborators(config, resolver, provider)
    }

    /// Create a server with explicit session and chat collaborators.
    pub fn with_collaborators(
        config: GatewayConfig,
        resolver: Arc<dyn SessionResolver>,
        provider: Arc<dyn ResponseProvider>,
    ) -> Result<Self, ServerError> {
        let proxy_state = ProxyState::from_config(&config, resolver.clone())?;
        let guard_state = GuardState {
            guard: Arc::new(RouteGuard::from_config(&config.guard)),
            resolver,
        };
        let chat_state = ChatState { provider };

        let router = Self::build_router(&config, proxy_state, guard_state, chat_state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GatewayConfig,
        proxy_state: ProxyState,
        guard_state: GuardState,
        chat_state: ChatState,
    ) -> Router {
        let backend = Router::new()
            .route("/api/backend", any(backend_proxy_handler))
            .route("/api/backend/", any(backend_proxy_handler))
            .route("/api/backend/{*path}", any(backend_proxy_handler));

        let blog = Router::new()
            .route("/api/blog/posts", get(blog_proxy_handler))
            .route("/api/blog/posts/{*slug}", get(blog_proxy_handler));

        let proxy = backend.merge(blog).with_state(proxy_state);

        let chat = Router::new()
            .route("/api/chat", post(chat_handler))
            .with_state(chat_state);

        Router::new()
            .route("/healthz", get(health_handler))
            .merge(proxy)
            .merge(chat)
            .fallback_service(ServeDir::new(&config.pages.static_dir).append_index_html_on_directories(true))
            .layer(middleware::from_fn_with_state(guard_state, route_guard_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.api_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
