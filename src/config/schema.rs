//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API and blog origins.
    pub upstream: UpstreamConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Route Guard classification.
    pub guard: GuardConfig,

    /// Backend proxy limits.
    pub proxy: ProxySettings,

    /// Simulated chat responder.
    pub chat: ChatConfig,

    /// Static page serving.
    pub pages: PagesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Total time allowed for a single inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream origins and the outbound timeout shared by every proxy route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend API (e.g., "https://api.example.com").
    pub api_url: String,

    /// Base URL of the blog service. Falls back to `api_url` when unset.
    pub blog_url: Option<String>,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            blog_url: None,
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    /// Origin used for the blog listing proxy.
    pub fn blog_origin(&self) -> &str {
        self.blog_url.as_deref().unwrap_or(&self.api_url)
    }
}

/// Placeholder signing secret shipped in the defaults.
pub const DEFAULT_SESSION_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to verify session cookie signatures.
    pub secret: String,

    /// Name of the signed session cookie.
    pub cookie_name: String,

    /// Name of the legacy bearer token cookie.
    pub legacy_cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Set SESSION_SECRET in production.
            secret: DEFAULT_SESSION_SECRET.to_string(),
            cookie_name: "session-token".to_string(),
            legacy_cookie_name: "auth_token".to_string(),
        }
    }
}

impl SessionConfig {
    /// Whether cookies are still signed with the published placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SESSION_SECRET
    }
}

/// Route Guard classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Path prefixes that require a session.
    pub protected_prefixes: Vec<String>,

    /// Path prefixes of the login/register pages.
    pub auth_entry_prefixes: Vec<String>,

    /// Where unauthenticated visitors are sent.
    pub login_path: String,

    /// Query parameter carrying the post-login destination.
    pub callback_param: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![
                "/settings".to_string(),
                "/analysis".to_string(),
                "/plans".to_string(),
            ],
            auth_entry_prefixes: vec!["/auth/login".to_string(), "/auth/register".to_string()],
            login_path: "/auth/login".to_string(),
            callback_param: "callbackUrl".to_string(),
        }
    }
}

/// Backend proxy limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Maximum inbound body size forwarded upstream.
    pub max_body_bytes: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Simulated chat responder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Lower bound of the simulated thinking delay in milliseconds.
    pub min_delay_ms: u64,

    /// Upper bound of the simulated thinking delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 2000,
        }
    }
}

/// Static page serving.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory holding the pre-rendered site.
    pub static_dir: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            static_dir: "public".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when RUST_LOG is unset.
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "docchat_gateway=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
