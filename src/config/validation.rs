//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate origins and value ranges (timeouts > 0, delays ordered)
//! - Detect prefixes classified as both protected and auth-entry
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidOrigin { field: &'static str, value: String },

    #[error("session secret must not be empty")]
    EmptySecret,

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("route prefix {0:?} must start with '/'")]
    RelativePrefix(String),

    #[error("protected prefix {protected:?} overlaps auth-entry prefix {auth_entry:?}")]
    OverlappingPrefix { protected: String, auth_entry: String },

    #[error("chat.min_delay_ms ({min}) exceeds chat.max_delay_ms ({max})")]
    DelayRange { min: u64, max: u64 },
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_origin("upstream.api_url", &config.upstream.api_url, &mut errors);
    if let Some(blog) = &config.upstream.blog_url {
        check_origin("upstream.blog_url", blog, &mut errors);
    }

    if config.session.secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.timeout_secs" });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "listener.request_timeout_secs" });
    }
    if config.proxy.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "proxy.max_body_bytes" });
    }

    let guard = &config.guard;
    for prefix in guard.protected_prefixes.iter().chain(&guard.auth_entry_prefixes) {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(prefix.clone()));
        }
    }
    // Classification is by prefix, so nested prefixes overlap too.
    for protected in &guard.protected_prefixes {
        for auth_entry in &guard.auth_entry_prefixes {
            if protected.starts_with(auth_entry.as_str()) || auth_entry.starts_with(protected.as_str()) {
                errors.push(ValidationError::OverlappingPrefix {
                    protected: protected.clone(),
                    auth_entry: auth_entry.clone(),
                });
            }
        }
    }

    if config.chat.min_delay_ms > config.chat.max_delay_ms {
        errors.push(ValidationError::DelayRange {
            min: config.chat.min_delay_ms,
            max: config.chat.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let ok = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !ok {
        errors.push(ValidationError::InvalidOrigin {
            field,
            value: value.to_string(),
        });
    }
}
