//! Page rendering.
//!
//! # Data Flow
//! ```text
//! Resolution::Serve { page, canonical_path } + site settings snapshot
//!     → PageContext (request-scoped, read-only)
//!     → page.rs (document) ← seo.rs (title, head tags)
//!                          ← schema.rs (JSON-LD)
//!                          ← bindings.rs (field and computed values)
//!
//! Sitemap:
//!     PageStore::list_range → sitemap.rs
//! ```
//!
//! # Design Decisions
//! - Every render stage takes the context explicitly; there is no ambient
//!   "current page" state
//! - All row text is escaped at the point it enters markup

pub mod bindings;
pub mod context;
pub mod page;
pub mod schema;
pub mod seo;
pub mod sitemap;

pub use context::PageContext;
pub use page::{render_not_found, render_page};
pub use sitemap::{render_sitemap, SITEMAP_PAGE_SIZE};

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
