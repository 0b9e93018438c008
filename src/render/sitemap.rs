//! XML sitemap of canonical page URLs.

use std::fmt::Write;

use chrono::SecondsFormat;

use crate::config::SiteConfig;
use crate::render::escape_html;
use crate::routing::canonical_path;
use crate::store::LocalPage;

/// Entries per sitemap page.
pub const SITEMAP_PAGE_SIZE: i64 = 2000;

/// Number of sitemap pages needed for `count` rows.
pub fn page_count(count: i64) -> i64 {
    (count.max(0) + SITEMAP_PAGE_SIZE - 1) / SITEMAP_PAGE_SIZE
}

/// A `<urlset>` for one window of rows. Rows without a usable canonical URL
/// are skipped.
pub fn render_sitemap(pages: &[LocalPage], site: &SiteConfig) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in pages {
        let path = canonical_path(page);
        if path == "/" {
            continue;
        }
        let _ = writeln!(
            out,
            "<url><loc>{}</loc><lastmod>{}</lastmod></url>",
            escape_html(&site.absolute_url(&path)),
            page.updated_at.to_rfc3339_opts(SecondsFormat::Secs, false)
        );
    }

    out.push_str("</urlset>\n");
    out
}
