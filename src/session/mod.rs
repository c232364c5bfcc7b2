//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → cookies.rs (split name=value pairs)
//!     → resolver.rs (verify HMAC signature, decode Session, check expiry)
//!     → credential.rs (session access token, else legacy auth_token cookie)
//!     → Route Guard (authenticated?) / Reverse Proxy (Authorization header)
//! ```
//!
//! # Design Decisions
//! - Sessions are read-only here; the auth provider owns their lifecycle
//! - Resolution sits behind the `SessionResolver` trait so another store can
//!   be swapped in without touching the guard or the proxy
//! - Bad signatures and expired sessions are "no session", not errors

pub mod cookies;
pub mod credential;
pub mod resolver;

pub use credential::{resolve_credential, Credential, CredentialSource};
pub use resolver::{Session, SessionError, SessionResolver, SignedCookieResolver};
