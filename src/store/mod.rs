//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     DatabaseConfig → Database::connect → migrations.rs (additive, versioned)
//!
//! Requests:
//!     resolver / admin API → pages.rs (LocalPage rows)
//!     redirect table / admin API → redirects.rs (RedirectRule rows)
//! ```
//!
//! # Design Decisions
//! - SQLite through a shared `SqlitePool`; stores are cheap `Clone` handles
//! - Normalized service/city slugs are written alongside the free text, so
//!   canonical lookups are a single indexed query
//! - Unique-constraint failures surface as `StoreError::ConstraintViolation`

pub mod migrations;
pub mod pages;
pub mod redirects;
pub mod types;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config::DatabaseConfig;

pub use pages::{PageStore, MAX_SLUG_ATTEMPTS};
pub use redirects::RedirectStore;
pub use types::{
    LocalPage, NewLocalPage, NewRedirectRule, PagePatch, RedirectRule, RedirectType, StoreError,
    StoreResult,
};

/// Handle to the backing database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let db = Self::connect_uninitialized(&config.url, config.max_connections).await?;
        migrations::run_migrations(&db.pool).await?;
        tracing::info!(url = %config.url, "Database ready");
        Ok(db)
    }

    /// Private in-memory database, migrated. Used by tests and demos.
    pub async fn in_memory() -> StoreResult<Self> {
        let db = Self::connect_uninitialized("sqlite::memory:", 1).await?;
        migrations::run_migrations(&db.pool).await?;
        Ok(db)
    }

    /// Connect without running migrations.
    ///
    /// An in-memory database lives only as long as its connection, so the
    /// pool never retires idle connections.
    pub async fn connect_uninitialized(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn pages(&self) -> PageStore {
        PageStore::new(self.pool.clone())
    }

    pub fn redirects(&self) -> RedirectStore {
        RedirectStore::new(self.pool.clone())
    }
}
