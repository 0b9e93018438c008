//! LocalSEO router library.
//!
//! Serves database-backed local landing pages under
//! `/service/{service}/{city}/`, redirects legacy `/localseo/{slug}/`
//! URLs to them, and applies a table of static redirect rules first.

// Request path
pub mod http;
pub mod redirects;
pub mod render;
pub mod routing;
pub mod store;

// Content and management
pub mod admin;
pub mod ai;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use store::Database;
