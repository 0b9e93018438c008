//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → sections handed to each subsystem at startup
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the site settings
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an empty file is a valid config
//! - Only `[site]` is hot-reloaded; listener, database and cache
//!   settings take effect on restart
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use watcher::ConfigWatcher;
pub use schema::{
    AdminConfig, AiConfig, AiProvider, DatabaseConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RedirectConfig, SecurityConfig, ServerConfig, SiteConfig, TimeoutConfig,
};
