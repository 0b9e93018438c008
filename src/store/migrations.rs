//! Versioned schema migrations.
//!
//! Migrations are additive and idempotent: each step only creates tables,
//! adds nullable/defaulted columns or creates indexes, and checks before it
//! acts so re-running a step against an already-migrated database is a no-op.
//! Applied versions are recorded in `schema_version`.

use sqlx::SqlitePool;

use crate::routing::slug::normalize;
use crate::store::types::StoreResult;

/// Increment when adding a migration.
pub const CURRENT_SCHEMA_VERSION: i64 = 3;

async fn schema_version(pool: &SqlitePool) -> StoreResult<i64> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await?;

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

async fn record_version(pool: &SqlitePool, version: i64) -> StoreResult<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> StoreResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

async fn add_column(pool: &SqlitePool, table: &str, column: &str, ddl: &str) -> StoreResult<()> {
    if !has_column(pool, table, column).await? {
        sqlx::query(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, ddl))
            .execute(pool)
            .await?;
        tracing::info!(table, column, "Added column");
    }
    Ok(())
}

/// Run all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    let current = schema_version(pool).await?;

    if current >= CURRENT_SCHEMA_VERSION {
        if current > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                database = current,
                code = CURRENT_SCHEMA_VERSION,
                "Database schema is newer than this build"
            );
        } else {
            tracing::debug!(version = current, "Database schema is up to date");
        }
        return Ok(());
    }

    tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "Running database migrations");

    if current < 1 {
        migrate_v1(pool).await?;
        record_version(pool, 1).await?;
    }
    if current < 2 {
        migrate_v2(pool).await?;
        record_version(pool, 2).await?;
    }
    if current < 3 {
        migrate_v3(pool).await?;
        record_version(pool, 3).await?;
    }

    tracing::info!(version = CURRENT_SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// v1: base tables.
async fn migrate_v1(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS localseo_pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city TEXT NOT NULL,
            zip TEXT NOT NULL DEFAULT '',
            service_keyword TEXT NOT NULL,
            slug TEXT UNIQUE,
            ai_intro TEXT NOT NULL DEFAULT '',
            meta_title TEXT NOT NULL DEFAULT '',
            meta_description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS localseo_redirects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_path TEXT NOT NULL UNIQUE,
            target_url TEXT NOT NULL,
            redirect_type INTEGER NOT NULL DEFAULT 301,
            hits INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// v2: free-text content columns.
async fn migrate_v2(pool: &SqlitePool) -> StoreResult<()> {
    add_column(pool, "localseo_pages", "nearby_cities", "TEXT NOT NULL DEFAULT ''").await?;
    add_column(pool, "localseo_pages", "local_landmarks", "TEXT NOT NULL DEFAULT ''").await?;
    Ok(())
}

/// v3: normalized service/city columns for canonical URL lookups, backfilled
/// from the existing rows.
async fn migrate_v3(pool: &SqlitePool) -> StoreResult<()> {
    add_column(pool, "localseo_pages", "service_slug", "TEXT NOT NULL DEFAULT ''").await?;
    add_column(pool, "localseo_pages", "city_slug", "TEXT NOT NULL DEFAULT ''").await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_localseo_pages_slugs \
         ON localseo_pages (service_slug, city_slug)",
    )
    .execute(pool)
    .await?;

    let rows: Vec<(i64, String, String)> =
        sqlx::query_as("SELECT id, service_keyword, city FROM localseo_pages")
            .fetch_all(pool)
            .await?;

    let mut tx = pool.begin().await?;
    for (id, service, city) in &rows {
        sqlx::query("UPDATE localseo_pages SET service_slug = ?, city_slug = ? WHERE id = ?")
            .bind(normalize(service))
            .bind(normalize(city))
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    if !rows.is_empty() {
        tracing::info!(rows = rows.len(), "Backfilled normalized page slugs");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        assert_eq!(schema_version(db.pool()).await.unwrap(), CURRENT_SCHEMA_VERSION);
        let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(versions, CURRENT_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_v3_backfills_existing_rows() {
        let db = Database::connect_uninitialized("sqlite::memory:", 1).await.unwrap();
        let pool = db.pool();

        assert_eq!(schema_version(pool).await.unwrap(), 0);
        migrate_v1(pool).await.unwrap();
        record_version(pool, 1).await.unwrap();
        sqlx::query(
            "INSERT INTO localseo_pages (city, service_keyword, created_at, updated_at) \
             VALUES ('St. Heddinge', 'Kloakmester Service', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(pool)
        .await
        .unwrap();

        run_migrations(pool).await.unwrap();

        let (service_slug, city_slug): (String, String) =
            sqlx::query_as("SELECT service_slug, city_slug FROM localseo_pages")
                .fetch_one(pool)
                .await
                .unwrap();
        assert_eq!(service_slug, "kloakmester-service");
        assert_eq!(city_slug, "st-heddinge");
        assert!(has_column(pool, "localseo_pages", "nearby_cities").await.unwrap());
    }
}
