//! LocalPage persistence.
//!
//! # Responsibilities
//! - CRUD over `localseo_pages`
//! - Legacy slug derivation with bounded numeric disambiguation
//! - Lookup by normalized (service, city) pair for canonical URLs
//!
//! # Design Decisions
//! - `service_slug`/`city_slug` are maintained on every write with the same
//!   normalizer the resolver applies to URLs; the lookup compares them exactly
//! - Duplicate (service, city) pairs are allowed; lookups return the oldest row
//! - Slug derivation gives up after `MAX_SLUG_ATTEMPTS` candidates

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::routing::slug::{normalize, page_slug};
use crate::store::types::{LocalPage, NewLocalPage, PagePatch, StoreError, StoreResult};

/// Candidates tried for a derived slug: `base`, `base-1` … `base-99`.
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

const PAGE_COLUMNS: &str = "id, city, zip, service_keyword, slug, ai_intro, meta_title, \
    meta_description, nearby_cities, local_landmarks, created_at, updated_at";

fn select(clause: &str) -> String {
    format!("SELECT {} FROM localseo_pages {}", PAGE_COLUMNS, clause)
}

fn required(field: &str, value: &str) -> StoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

/// Store for LocalPage rows.
#[derive(Debug, Clone)]
pub struct PageStore {
    pool: SqlitePool,
}

impl PageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All rows, most recently created first.
    pub async fn get_all(&self) -> StoreResult<Vec<LocalPage>> {
        let sql = select("ORDER BY id DESC");
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<LocalPage>> {
        let sql = select("WHERE id = ?");
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Exact match on the legacy slug.
    pub async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<LocalPage>> {
        let sql = select("WHERE slug = ?");
        Ok(sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Find the first row whose normalized service and city equal the given
    /// URL segments. Empty segments never match.
    pub async fn get_by_service_city_slugs(
        &self,
        service_slug: &str,
        city_slug: &str,
    ) -> StoreResult<Option<LocalPage>> {
        if service_slug.is_empty() || city_slug.is_empty() {
            return Ok(None);
        }

        let sql = select("WHERE service_slug = ? AND city_slug = ? ORDER BY id ASC LIMIT 1");
        Ok(sqlx::query_as(&sql)
            .bind(service_slug)
            .bind(city_slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Rows where the intro, meta title or meta description is blank.
    pub async fn get_rows_missing_ai_content(&self) -> StoreResult<Vec<LocalPage>> {
        let sql = select(
            "WHERE TRIM(COALESCE(ai_intro, '')) = '' \
             OR TRIM(COALESCE(meta_title, '')) = '' \
             OR TRIM(COALESCE(meta_description, '')) = '' \
             ORDER BY id ASC",
        );
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM localseo_pages")
            .fetch_one(&self.pool)
            .await?)
    }

    /// A window of rows in creation order.
    pub async fn list_range(&self, limit: i64, offset: i64) -> StoreResult<Vec<LocalPage>> {
        let sql = select("ORDER BY id ASC LIMIT ? OFFSET ?");
        Ok(sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn slug_exists(&self, slug: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM localseo_pages WHERE slug = ?)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a row and return its id.
    ///
    /// An explicit slug is normalized and must be unique. Without one, a slug
    /// is derived from `service_keyword-city`.
    pub async fn insert(&self, page: NewLocalPage) -> StoreResult<i64> {
        let city = required("city", &page.city)?;
        let service_keyword = required("service_keyword", &page.service_keyword)?;

        let explicit = page.slug.as_deref().map(normalize).filter(|s| !s.is_empty());
        if let Some(slug) = explicit {
            return self
                .insert_row(&page, &city, &service_keyword, Some(&slug))
                .await;
        }

        let base = page_slug(&service_keyword, &city);
        if base.is_empty() {
            return self.insert_row(&page, &city, &service_keyword, None).await;
        }
        self.insert_with_derived_slug(&page, &city, &service_keyword, &base)
            .await
    }

    /// Try `base`, `base-1`, … within the attempt bound. A candidate taken
    /// between the existence check and the insert is skipped like any other.
    async fn insert_with_derived_slug(
        &self,
        page: &NewLocalPage,
        city: &str,
        service_keyword: &str,
        base: &str,
    ) -> StoreResult<i64> {
        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.to_string()
            } else {
                format!("{}-{}", base, attempt)
            };
            if self.slug_exists(&candidate).await? {
                continue;
            }
            match self
                .insert_row(page, city, service_keyword, Some(&candidate))
                .await
            {
                Err(StoreError::ConstraintViolation(_)) => {
                    tracing::debug!(slug = %candidate, "Slug claimed concurrently, trying next");
                }
                result => return result,
            }
        }

        Err(StoreError::SlugCollisionExhausted {
            base: base.to_string(),
            attempts: MAX_SLUG_ATTEMPTS,
        })
    }

    async fn insert_row(
        &self,
        page: &NewLocalPage,
        city: &str,
        service_keyword: &str,
        slug: Option<&str>,
    ) -> StoreResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO localseo_pages (
                city, zip, service_keyword, slug, service_slug, city_slug,
                ai_intro, meta_title, meta_description, nearby_cities, local_landmarks,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(city)
        .bind(page.zip.trim())
        .bind(service_keyword)
        .bind(slug)
        .bind(normalize(service_keyword))
        .bind(normalize(city))
        .bind(&page.ai_intro)
        .bind(&page.meta_title)
        .bind(&page.meta_description)
        .bind(&page.nearby_cities)
        .bind(&page.local_landmarks)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, slug = ?slug, "Inserted local page");
        Ok(id)
    }

    /// Patch the provided fields and return the updated row.
    pub async fn update(&self, id: i64, patch: PagePatch) -> StoreResult<LocalPage> {
        if !patch.is_empty() {
            let mut qb = QueryBuilder::<Sqlite>::new("UPDATE localseo_pages SET updated_at = ");
            qb.push_bind(Utc::now());

            if let Some(city) = &patch.city {
                let city = required("city", city)?;
                qb.push(", city_slug = ").push_bind(normalize(&city));
                qb.push(", city = ").push_bind(city);
            }
            if let Some(service) = &patch.service_keyword {
                let service = required("service_keyword", service)?;
                qb.push(", service_slug = ").push_bind(normalize(&service));
                qb.push(", service_keyword = ").push_bind(service);
            }
            if let Some(slug) = &patch.slug {
                let slug = Some(normalize(slug)).filter(|s| !s.is_empty());
                qb.push(", slug = ").push_bind(slug);
            }

            let text_fields = [
                ("zip", patch.zip),
                ("ai_intro", patch.ai_intro),
                ("meta_title", patch.meta_title),
                ("meta_description", patch.meta_description),
                ("nearby_cities", patch.nearby_cities),
                ("local_landmarks", patch.local_landmarks),
            ];
            for (column, value) in text_fields {
                if let Some(value) = value {
                    qb.push(format!(", {} = ", column)).push_bind(value);
                }
            }

            qb.push(" WHERE id = ").push_bind(id);
            let result = qb.build().execute(&self.pool).await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { entity: "page", id });
            }
        }

        self.get_by_id(id)
            .await?
            .ok_or(StoreError::NotFound { entity: "page", id })
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM localseo_pages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "page", id });
        }
        Ok(())
    }
}
