//! Static redirect table consulted before page resolution.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → normalize_source_path (leading slash, no trailing slash)
//!     → cached rule snapshot (reloaded from the store after the TTL)
//!     → match: bump hits, return target + status
//!
//! Admin insert / delete
//!     → RedirectStore write
//!     → invalidate (bump generation, drop snapshot)
//! ```
//!
//! # Design Decisions
//! - The snapshot is swapped atomically; readers never block each other
//! - Each snapshot carries the generation it was loaded under; one from an
//!   older generation is never served, so a deleted rule cannot come back
//!   from an in-flight load
//! - Hit counting is best effort: failures are logged, never surfaced

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::store::redirects::normalize_source_path;
use crate::store::{NewRedirectRule, RedirectRule, RedirectStore, RedirectType, StoreResult};

/// Paths owned by the service itself; never redirected.
const EXEMPT_PREFIXES: &[&str] = &["/admin", "/health"];

/// True for admin and internal paths.
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// A matched rule, as handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectMatch {
    pub id: i64,
    pub target_url: String,
    pub redirect_type: RedirectType,
}

#[derive(Debug)]
struct Snapshot {
    rules: Vec<RedirectMatchRule>,
    loaded_at: Instant,
    /// Table generation observed before the load started.
    generation: u64,
}

#[derive(Debug)]
struct RedirectMatchRule {
    key: String,
    matched: RedirectMatch,
}

impl Snapshot {
    fn new(rules: Vec<RedirectRule>, generation: u64) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let key = normalize_source_path(&rule.source_path)?;
                Some(RedirectMatchRule {
                    key,
                    matched: RedirectMatch {
                        id: rule.id,
                        target_url: rule.target_url,
                        redirect_type: rule.redirect_type,
                    },
                })
            })
            .collect();
        Self {
            rules,
            loaded_at: Instant::now(),
            generation,
        }
    }

    fn find(&self, key: &str) -> Option<&RedirectMatch> {
        self.rules.iter().find(|r| r.key == key).map(|r| &r.matched)
    }
}

/// Cached view over the redirect rules.
#[derive(Debug)]
pub struct RedirectTable {
    store: RedirectStore,
    ttl: Duration,
    snapshot: ArcSwapOption<Snapshot>,
    generation: AtomicU64,
}

impl RedirectTable {
    pub fn new(store: RedirectStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            snapshot: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
        }
    }

    /// A snapshot is served only while it is fresh and no invalidation has
    /// happened since its load began.
    async fn rules(&self) -> StoreResult<Arc<Snapshot>> {
        let generation = self.generation.load(Ordering::Acquire);
        if let Some(snapshot) = self.snapshot.load_full() {
            if snapshot.generation == generation && snapshot.loaded_at.elapsed() < self.ttl {
                return Ok(snapshot);
            }
        }

        let snapshot = Arc::new(Snapshot::new(
            self.store.all_for_matching().await?,
            generation,
        ));
        metrics::record_redirect_cache_refresh(snapshot.rules.len());

        if self.generation.load(Ordering::Acquire) == generation {
            self.snapshot.store(Some(Arc::clone(&snapshot)));
        }
        Ok(snapshot)
    }

    /// Find the rule for `path` without counting a hit.
    pub async fn lookup(&self, path: &str) -> StoreResult<Option<RedirectMatch>> {
        let Some(key) = normalize_source_path(path) else {
            return Ok(None);
        };
        let snapshot = self.rules().await?;
        Ok(snapshot.find(&key).cloned())
    }

    /// Look up `path` and, on a match, record the hit.
    pub async fn process(&self, path: &str) -> StoreResult<Option<RedirectMatch>> {
        let matched = self.lookup(path).await?;
        if let Some(rule) = &matched {
            if let Err(e) = self.store.increment_hits(rule.id).await {
                tracing::warn!(id = rule.id, error = %e, "Failed to record redirect hit");
            }
            metrics::record_redirect_hit();
            tracing::debug!(path, target = %rule.target_url, "Redirect rule matched");
        }
        Ok(matched)
    }

    pub async fn insert(&self, rule: NewRedirectRule) -> StoreResult<i64> {
        let result = self.store.insert(rule).await;
        self.invalidate();
        result
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = self.store.delete(id).await;
        self.invalidate();
        result
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<RedirectRule>> {
        self.store.get_by_id(id).await
    }

    /// All rules with live hit counts, newest first. Not cached.
    pub async fn list(&self) -> StoreResult<Vec<RedirectRule>> {
        self.store.list().await
    }

    pub async fn count(&self) -> StoreResult<i64> {
        self.store.count().await
    }

    /// Drop the cached snapshot; the next lookup reloads.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.snapshot.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;

    async fn table(ttl: Duration) -> (RedirectTable, RedirectStore) {
        let store = Database::in_memory().await.unwrap().redirects();
        (RedirectTable::new(store.clone(), ttl), store)
    }

    fn rule(source: &str, target: &str, redirect_type: RedirectType) -> NewRedirectRule {
        NewRedirectRule {
            source_path: source.into(),
            target_url: target.into(),
            redirect_type,
        }
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/admin"));
        assert!(is_exempt("/admin/pages"));
        assert!(is_exempt("/health"));
        assert!(!is_exempt("/administrator"));
        assert!(!is_exempt("/old-page"));
    }

    #[tokio::test]
    async fn test_trailing_slash_equivalence_and_hits() {
        let (table, store) = table(Duration::from_secs(3600)).await;
        let id = table
            .insert(rule("/old-page", "https://x/new", RedirectType::Permanent))
            .await
            .unwrap();

        for path in ["/old-page", "/old-page/"] {
            let matched = table.process(path).await.unwrap().unwrap();
            assert_eq!(matched.target_url, "https://x/new");
            assert_eq!(matched.redirect_type.status_code(), 301);
        }

        assert_eq!(store.get_by_id(id).await.unwrap().unwrap().hits, 2);
    }

    #[tokio::test]
    async fn test_lookup_does_not_count() {
        let (table, store) = table(Duration::from_secs(3600)).await;
        let id = table
            .insert(rule("/a/", "/b", RedirectType::Temporary))
            .await
            .unwrap();

        let matched = table.lookup("/a").await.unwrap().unwrap();
        assert_eq!(matched.redirect_type, RedirectType::Temporary);
        assert_eq!(store.get_by_id(id).await.unwrap().unwrap().hits, 0);
        assert!(table.lookup("/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_visible_within_ttl() {
        let (table, _) = table(Duration::from_secs(3600)).await;
        let id = table
            .insert(rule("/old-page", "/new", RedirectType::Permanent))
            .await
            .unwrap();
        assert!(table.process("/old-page").await.unwrap().is_some());

        table.delete(id).await.unwrap();
        assert!(table.process("/old-page").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_from_before_invalidation_is_not_served() {
        let (table, _) = table(Duration::from_secs(3600)).await;
        let id = table
            .insert(rule("/old-page", "/new", RedirectType::Permanent))
            .await
            .unwrap();
        assert!(table.lookup("/old-page").await.unwrap().is_some());
        let loaded = table.snapshot.load_full().unwrap();

        table.delete(id).await.unwrap();
        // a reload that began before the delete lands after the invalidation
        table.snapshot.store(Some(loaded));

        assert!(table.lookup("/old-page").await.unwrap().is_none());
        let current = table.snapshot.load_full().unwrap();
        assert_eq!(current.generation, table.generation.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_cache_serves_stale_until_ttl() {
        let (table, store) = table(Duration::from_secs(3600)).await;
        assert!(table.lookup("/x").await.unwrap().is_none());

        // written behind the table's back: not visible until invalidated
        store
            .insert(rule("/x", "/y", RedirectType::Permanent))
            .await
            .unwrap();
        assert!(table.lookup("/x").await.unwrap().is_none());

        table.invalidate();
        assert!(table.lookup("/x").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_snapshot_reloads() {
        let (table, store) = table(Duration::ZERO).await;
        assert!(table.lookup("/x").await.unwrap().is_none());
        store
            .insert(rule("/x", "/y", RedirectType::Permanent))
            .await
            .unwrap();
        assert!(table.lookup("/x").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_root_rule() {
        let (table, _) = table(Duration::from_secs(60)).await;
        table
            .insert(rule("/", "https://example.com/", RedirectType::Permanent))
            .await
            .unwrap();
        assert!(table.lookup("/").await.unwrap().is_some());
        assert!(table.lookup("").await.unwrap().is_none());
    }
}
