//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (API_URL / BLOG_API_URL / SESSION_SECRET / BIND_ADDRESS overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; route classification is fixed at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ChatConfig, GatewayConfig, GuardConfig, ListenerConfig, ObservabilityConfig, PagesConfig,
    ProxySettings, SessionConfig, UpstreamConfig,
};
pub use validation::ValidationError;
