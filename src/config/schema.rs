//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the LocalSEO router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// SQLite connection settings.
    pub database: DatabaseConfig,

    /// Redirect table cache settings.
    pub redirects: RedirectConfig,

    /// Site-wide settings consumed by the page renderer.
    pub site: SiteConfig,

    /// AI content generation settings.
    pub ai: AiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite://localseo.db?mode=rwc").
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://localseo.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Redirect table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// How long the cached rule list is served before it is reloaded.
    pub cache_ttl_secs: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
        }
    }
}

/// Site-wide rendering settings.
///
/// Hot-reloadable: the running server swaps this section when the config
/// file changes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base URL of the public site, used for canonical and sitemap URLs.
    pub base_url: String,

    /// Site name for Open Graph and breadcrumbs.
    pub site_name: String,

    /// Business name for structured data. Falls back to `site_name` when empty.
    pub business_name: String,

    /// Business phone number shown in CTAs and structured data.
    pub business_phone: String,

    /// Default Open Graph image URL.
    pub og_image: String,

    /// Robots meta directive.
    pub robots: String,

    /// Emit JSON-LD structured data.
    pub schema_enabled: bool,

    /// Schema.org type for structured data.
    pub schema_type: String,

    /// Serve the page sitemap.
    pub sitemap_enabled: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            site_name: "LocalSEO".to_string(),
            business_name: String::new(),
            business_phone: String::new(),
            og_image: String::new(),
            robots: "index, follow".to_string(),
            schema_enabled: true,
            schema_type: "LocalBusiness".to_string(),
            sitemap_enabled: true,
        }
    }
}

impl SiteConfig {
    /// Business name with the site name as fallback.
    pub fn business_name(&self) -> &str {
        if self.business_name.is_empty() {
            &self.site_name
        } else {
            &self.business_name
        }
    }

    /// Join a site-relative path onto the base URL.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// AI provider selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Anthropic,
}

/// AI content generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,

    /// Provider API key. Generation is refused while empty.
    pub api_key: String,

    /// Prompt template with `{service}`, `{city}` and `{zip}` placeholders.
    pub prompt_template: String,

    /// Override for the provider endpoint (testing, proxies).
    pub endpoint: Option<String>,

    /// Provider request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Pause between rows during bulk generation, in milliseconds.
    pub bulk_delay_ms: u64,
}

pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are an SEO expert for a local service company. \
Write a 50-word intro for {service} in {city} ({zip}). Focus on local expertise and trust.";

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::OpenAi,
            api_key: String::new(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            endpoint: None,
            request_timeout_secs: 30,
            bulk_delay_ms: 500,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.redirects.cache_ttl_secs, 3600);
        assert_eq!(config.site.robots, "index, follow");
        assert_eq!(config.ai.provider, AiProvider::OpenAi);
        assert_eq!(config.ai.bulk_delay_ms, 500);
    }

    #[test]
    fn test_partial_sections() {
        let config: ServerConfig = toml::from_str(
            r#"
            [site]
            base_url = "https://example.dk/"
            business_phone = "+45 12 34 56 78"

            [ai]
            provider = "anthropic"
            "#,
        )
        .unwrap();

        assert_eq!(config.ai.provider, AiProvider::Anthropic);
        assert_eq!(config.site.schema_type, "LocalBusiness");
        assert_eq!(
            config.site.absolute_url("/service/a/b/"),
            "https://example.dk/service/a/b/"
        );
    }

    #[test]
    fn test_business_name_fallback() {
        let mut site = SiteConfig::default();
        assert_eq!(site.business_name(), "LocalSEO");
        site.business_name = "Jensen VVS".into();
        assert_eq!(site.business_name(), "Jensen VVS");
    }
}
