//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Upstream API origin.
pub const ENV_API_URL: &str = "API_URL";
/// Blog service origin.
pub const ENV_BLOG_API_URL: &str = "BLOG_API_URL";
/// Session signing secret.
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
/// Listener bind address.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse a TOML document into a configuration (no validation).
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay environment values onto a configuration.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a file setting.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_API_URL) {
        config.upstream.api_url = url;
    }
    if let Some(url) = get(ENV_BLOG_API_URL) {
        config.upstream.blog_url = Some(url);
    }
    if let Some(secret) = get(ENV_SESSION_SECRET) {
        config.session.secret = secret;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}
