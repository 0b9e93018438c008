//! Document title and SEO head tags.

use std::fmt::Write;

use crate::render::{escape_html, PageContext};

/// `metaTitle` when set, otherwise "{service} in {city}".
pub fn document_title(ctx: &PageContext) -> String {
    let meta_title = ctx.page().meta_title.trim();
    if !meta_title.is_empty() {
        return meta_title.to_string();
    }
    match (ctx.service(), ctx.city()) {
        ("", "") => String::new(),
        (service, "") => service.to_string(),
        ("", city) => city.to_string(),
        (service, city) => format!("{} in {}", service, city),
    }
}

fn meta(out: &mut String, attr: &str, key: &str, content: &str) {
    let _ = writeln!(
        out,
        r#"<meta {}="{}" content="{}">"#,
        attr,
        key,
        escape_html(content)
    );
}

/// Description, canonical, robots, Open Graph and Twitter tags.
pub fn head_tags(ctx: &PageContext) -> String {
    let site = ctx.site();
    let title = document_title(ctx);
    let description = ctx.page().meta_description.trim();
    let canonical = ctx.canonical_url();
    let og_image = site.og_image.trim();

    let mut out = String::new();

    if !description.is_empty() {
        meta(&mut out, "name", "description", description);
    }
    let _ = writeln!(out, r#"<link rel="canonical" href="{}">"#, escape_html(&canonical));
    meta(&mut out, "name", "robots", &site.robots);

    meta(&mut out, "property", "og:type", "website");
    meta(&mut out, "property", "og:title", &title);
    meta(&mut out, "property", "og:url", &canonical);
    meta(&mut out, "property", "og:site_name", &site.site_name);
    if !description.is_empty() {
        meta(&mut out, "property", "og:description", description);
    }
    if !og_image.is_empty() {
        meta(&mut out, "property", "og:image", og_image);
    }

    let card = if og_image.is_empty() {
        "summary"
    } else {
        "summary_large_image"
    };
    meta(&mut out, "name", "twitter:card", card);
    meta(&mut out, "name", "twitter:title", &title);
    if !description.is_empty() {
        meta(&mut out, "name", "twitter:description", description);
    }
    if !og_image.is_empty() {
        meta(&mut out, "name", "twitter:image", og_image);
    }

    out
}
