//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign / propagate request ID)
//!     → routing (Route Guard: redirect or proceed)
//!     → /api/backend/*  → proxy::backend
//!     → /api/blog/posts → proxy::blog
//!     → /api/chat       → chat
//!     → anything else   → static pages
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
