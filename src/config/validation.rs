//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, TTL > 0)
//! - Validate addresses and URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be > 0"));
    }

    if config.redirects.cache_ttl_secs == 0 {
        errors.push(ValidationError::new("redirects.cache_ttl_secs", "must be > 0"));
    }

    match url::Url::parse(&config.site.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::new(
            "site.base_url",
            format!("'{}' is not an absolute http(s) URL", config.site.base_url),
        )),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.ai.request_timeout_secs == 0 {
        errors.push(ValidationError::new("ai.request_timeout_secs", "must be > 0"));
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "admin.api_key",
            "must be set when the admin API is enabled",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.redirects.cache_ttl_secs = 0;
        config.site.base_url = "example.com".into();
        config.admin.api_key = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "redirects.cache_ttl_secs",
                "site.base_url",
                "admin.api_key"
            ]
        );
    }

    #[test]
    fn test_admin_key_only_required_when_enabled() {
        let mut config = ServerConfig::default();
        config.admin.enabled = false;
        config.admin.api_key.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = ServerConfig::default();
        config.site.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "site.base_url");
    }
}
