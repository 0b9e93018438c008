//! Request-scoped page data.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::store::LocalPage;

/// Everything a render stage may read for one resolved page.
///
/// Built once the resolver has found the row and dropped with the response.
/// Nothing in it is mutable.
#[derive(Debug, Clone)]
pub struct PageContext {
    page: LocalPage,
    canonical_path: String,
    site: Arc<SiteConfig>,
}

impl PageContext {
    pub fn new(page: LocalPage, canonical_path: String, site: Arc<SiteConfig>) -> Self {
        Self {
            page,
            canonical_path,
            site,
        }
    }

    pub fn page(&self) -> &LocalPage {
        &self.page
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Canonical path joined onto the configured base URL.
    pub fn canonical_url(&self) -> String {
        self.site.absolute_url(&self.canonical_path)
    }

    pub fn service(&self) -> &str {
        self.page.service_keyword.trim()
    }

    pub fn city(&self) -> &str {
        self.page.city.trim()
    }

    /// Nearby cities, split on commas, blanks dropped.
    pub fn nearby_cities(&self) -> Vec<&str> {
        self.page
            .nearby_cities
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// `tel:` link for the configured phone, keeping digits and `+`.
    pub fn phone_url(&self) -> Option<String> {
        let phone = self.site.business_phone.trim();
        if phone.is_empty() {
            return None;
        }
        let digits: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        Some(format!("tel:{}", digits))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn sample_page() -> LocalPage {
        let now = Utc::now();
        LocalPage {
            id: 1,
            city: "Dianalund".into(),
            zip: "4293".into(),
            service_keyword: "Kloakmester".into(),
            slug: Some("kloakmester-dianalund".into()),
            ai_intro: "Vi hjælper i Dianalund.".into(),
            meta_title: String::new(),
            meta_description: "Hurtig kloakmester i Dianalund".into(),
            nearby_cities: "Sorø, Slagelse, ,Ruds Vedby".into(),
            local_landmarks: "Filadelfia".into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn sample_context(site: SiteConfig) -> PageContext {
        PageContext::new(
            sample_page(),
            "/service/kloakmester/dianalund/".into(),
            Arc::new(site),
        )
    }

    #[test]
    fn test_canonical_url() {
        let site = SiteConfig {
            base_url: "https://example.dk/".into(),
            ..Default::default()
        };
        let ctx = sample_context(site);
        assert_eq!(
            ctx.canonical_url(),
            "https://example.dk/service/kloakmester/dianalund/"
        );
    }

    #[test]
    fn test_nearby_cities() {
        let ctx = sample_context(SiteConfig::default());
        assert_eq!(ctx.nearby_cities(), vec!["Sorø", "Slagelse", "Ruds Vedby"]);
    }

    #[test]
    fn test_phone_url() {
        let ctx = sample_context(SiteConfig::default());
        assert_eq!(ctx.phone_url(), None);

        let ctx = sample_context(SiteConfig {
            business_phone: "+45 12 34-56 78".into(),
            ..Default::default()
        });
        assert_eq!(ctx.phone_url().as_deref(), Some("tel:+4512345678"));
    }
}
