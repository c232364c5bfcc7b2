//! Edge gateway for the AI doctor chat web application.
//!
//! Guards page routes by session state, proxies authenticated calls to the
//! backend API, proxies the blog listing and hosts the chat responder.

pub mod chat;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod session;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
