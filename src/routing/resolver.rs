//! Virtual page resolution.
//!
//! # Responsibilities
//! - Map a request path to a stored LocalPage
//! - Decide between serving, redirecting to the canonical URL, 404 or
//!   leaving the path alone
//!
//! # Design Decisions
//! - Canonical URLs are served in place; legacy URLs always 301
//! - Captured segments are compared verbatim against the stored
//!   normalized columns
//! - A row whose service or city normalizes to nothing canonicalizes to `/`

use crate::routing::matcher::{PatternSet, RouteMatch};
use crate::routing::slug::normalize;
use crate::store::{LocalPage, PageStore, StoreResult};

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Not a LocalPage URL.
    PassThrough,
    /// A LocalPage URL with no matching row.
    NotFound,
    /// Legacy URL for an existing row; send a 301 to `location`.
    Redirect { location: String },
    /// Canonical URL for an existing row; render it.
    Serve {
        page: Box<LocalPage>,
        canonical_path: String,
    },
}

impl Resolution {
    /// Label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::PassThrough => "pass_through",
            Resolution::NotFound => "not_found",
            Resolution::Redirect { .. } => "legacy_redirect",
            Resolution::Serve { .. } => "serve",
        }
    }
}

/// The one canonical path for a row, `/service/{service}/{city}/`.
pub fn canonical_path(page: &LocalPage) -> String {
    let service = normalize(&page.service_keyword);
    let city = normalize(&page.city);
    if service.is_empty() || city.is_empty() {
        return "/".to_string();
    }
    format!("/service/{}/{}/", service, city)
}

/// Resolves request paths against the page store.
#[derive(Debug)]
pub struct RouteResolver {
    pages: PageStore,
    patterns: PatternSet,
}

impl RouteResolver {
    pub fn new(pages: PageStore) -> Self {
        Self {
            pages,
            patterns: PatternSet::default(),
        }
    }

    pub async fn resolve(&self, path: &str) -> StoreResult<Resolution> {
        let resolution = match self.patterns.match_path(path) {
            None => Resolution::PassThrough,
            Some(RouteMatch::Canonical { service, city }) => {
                match self.pages.get_by_service_city_slugs(service, city).await? {
                    Some(page) => {
                        let canonical_path = canonical_path(&page);
                        Resolution::Serve {
                            page: Box::new(page),
                            canonical_path,
                        }
                    }
                    None => Resolution::NotFound,
                }
            }
            Some(RouteMatch::Legacy { slug }) => match self.pages.get_by_slug(slug).await? {
                Some(page) => Resolution::Redirect {
                    location: canonical_path(&page),
                },
                None => Resolution::NotFound,
            },
        };

        tracing::debug!(path, outcome = resolution.outcome(), "Resolved route");
        Ok(resolution)
    }
}
