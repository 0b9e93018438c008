//! Redirect rule persistence.
//!
//! Source paths are stored in match form: one leading slash, no trailing
//! slash (the root path stays `/`). `/old-page` and `/old-page/` are
//! therefore the same rule and the unique index rejects the second.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::store::types::{
    NewRedirectRule, RedirectRule, RedirectType, StoreError, StoreResult,
};

/// Reduce a request or source path to its match form.
///
/// Returns `None` for blank input.
pub fn normalize_source_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let inner = path.trim_matches('/');
    if inner.is_empty() {
        Some("/".to_string())
    } else {
        Some(format!("/{}", inner))
    }
}

/// A target must be an absolute http(s) URL or a site-relative path.
fn validate_target(target: &str) -> StoreResult<String> {
    let target = target.trim();
    if target.starts_with('/') && !target.starts_with("//") {
        return Ok(target.to_string());
    }
    match url::Url::parse(target) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(target.to_string()),
        _ => Err(StoreError::InvalidInput(format!(
            "target_url must be an absolute http(s) URL or start with '/': '{}'",
            target
        ))),
    }
}

#[derive(sqlx::FromRow)]
struct RedirectRow {
    id: i64,
    source_path: String,
    target_url: String,
    redirect_type: i64,
    hits: i64,
    created_at: DateTime<Utc>,
}

impl From<RedirectRow> for RedirectRule {
    fn from(row: RedirectRow) -> Self {
        RedirectRule {
            id: row.id,
            source_path: row.source_path,
            target_url: row.target_url,
            redirect_type: RedirectType::from(row.redirect_type),
            hits: row.hits,
            created_at: row.created_at,
        }
    }
}

const REDIRECT_COLUMNS: &str = "id, source_path, target_url, redirect_type, hits, created_at";

/// Store for redirect rules. Callers that serve traffic should go through
/// the cached `RedirectTable` instead.
#[derive(Debug, Clone)]
pub struct RedirectStore {
    pool: SqlitePool,
}

impl RedirectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, rule: NewRedirectRule) -> StoreResult<i64> {
        let source = normalize_source_path(&rule.source_path)
            .ok_or_else(|| StoreError::InvalidInput("source_path must not be empty".into()))?;
        let target = validate_target(&rule.target_url)?;

        let result = sqlx::query(
            "INSERT INTO localseo_redirects (source_path, target_url, redirect_type, hits, created_at) \
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&source)
        .bind(&target)
        .bind(i64::from(rule.redirect_type.status_code()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM localseo_redirects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "redirect", id });
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<RedirectRule>> {
        let sql = format!("SELECT {} FROM localseo_redirects WHERE id = ?", REDIRECT_COLUMNS);
        let row: Option<RedirectRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(RedirectRule::from))
    }

    /// Newest first, with live hit counts.
    pub async fn list(&self) -> StoreResult<Vec<RedirectRule>> {
        self.fetch_ordered("DESC").await
    }

    /// Oldest first; the order rules are matched in.
    pub async fn all_for_matching(&self) -> StoreResult<Vec<RedirectRule>> {
        self.fetch_ordered("ASC").await
    }

    async fn fetch_ordered(&self, direction: &str) -> StoreResult<Vec<RedirectRule>> {
        let sql = format!(
            "SELECT {} FROM localseo_redirects ORDER BY id {}",
            REDIRECT_COLUMNS, direction
        );
        let rows: Vec<RedirectRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(RedirectRule::from).collect())
    }

    pub async fn increment_hits(&self, id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE localseo_redirects SET hits = hits + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM localseo_redirects")
            .fetch_one(&self.pool)
            .await?)
    }
}
