//! Routing subsystem (Route Guard).
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query, cookies)
//!     → guard.rs (classify: protected / auth-entry / public)
//!     → middleware.rs (resolve session only for non-public paths)
//!     → guard.rs (decide: proceed or 307 redirect)
//!
//! Guard Compilation (at startup):
//!     GuardConfig
//!     → matcher.rs (prefix sets)
//!     → Freeze as immutable RouteGuard
//! ```
//!
//! # Design Decisions
//! - Classification is fixed at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path always lands in the same class
//! - One decision per request, no side effects beyond the redirect

pub mod guard;
pub mod matcher;
pub mod middleware;

pub use guard::{GuardDecision, RedirectReason, RouteClass, RouteGuard};
pub use middleware::{route_guard_middleware, GuardState};
