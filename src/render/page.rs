//! HTML documents for resolved pages and misses.

use crate::render::bindings::{binding_value, cta_label};
use crate::render::schema::json_ld_script;
use crate::render::seo::{document_title, head_tags};
use crate::render::{escape_html, PageContext};

/// Blank-line separated paragraphs, escaped.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn hero_subtitle(ctx: &PageContext, service: &str, city: &str) -> String {
    let zip = escape_html(ctx.page().zip.trim());
    if zip.is_empty() {
        return format!("Vi rykker ud til {}-opgaver i {} og omegn.", service, city);
    }

    let mut subtitle = format!("Vi rykker ud til {}-opgaver i hele {} {}", service, zip, city);
    let nearby = ctx.nearby_cities();
    if !nearby.is_empty() {
        subtitle.push_str(", samt lokalområder som ");
        subtitle.push_str(&escape_html(&nearby.join(", ")));
    }
    subtitle.push('.');
    subtitle
}

/// Full landing page for a resolved row.
pub fn render_page(ctx: &PageContext) -> String {
    let service = escape_html(ctx.service());
    let city = escape_html(ctx.city());
    let title = escape_html(&document_title(ctx));

    let mut body = String::new();
    body.push_str(&format!(
        "<section class=\"localseo-hero\">\n<h1>{} i {} – Hurtig hjælp og lokale eksperter</h1>\n<p>{}</p>\n",
        service,
        city,
        hero_subtitle(ctx, &service, &city)
    ));
    if let Some(phone_url) = ctx.phone_url() {
        body.push_str(&format!(
            "<a class=\"localseo-btn\" href=\"{}\">{}</a>\n",
            escape_html(&phone_url),
            escape_html(&cta_label(ctx))
        ));
    }
    body.push_str("</section>\n");

    body.push_str(&format!(
        "<section class=\"localseo-local-relevance\">\n<h2>Din lokale {}-ekspert i {}</h2>\n",
        service, city
    ));
    let landmarks = ctx.page().local_landmarks.trim();
    if !landmarks.is_empty() {
        body.push_str(&format!(
            "<p>Uanset om du bor nær {} i {}, er vi klar til at hjælpe dig.</p>\n",
            escape_html(landmarks),
            city
        ));
    }
    let intro = paragraphs(&binding_value(ctx, "intro"));
    if !intro.is_empty() {
        body.push_str(&format!("<div class=\"localseo-intro\">\n{}\n</div>\n", intro));
    }
    let nearby = ctx.nearby_cities();
    if !nearby.is_empty() {
        body.push_str(&format!(
            "<p><strong>Vi kører også i:</strong> {}.</p>\n",
            escape_html(&nearby.join(", "))
        ));
    }
    body.push_str("</section>\n");

    body.push_str(&format!(
        "<section class=\"localseo-cta\">\n<h2>{}</h2>\n</section>\n",
        escape_html(&cta_label(ctx))
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="da">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
{tags}{schema}</head>
<body>
<article class="localseo-page">
{body}</article>
</body>
</html>
"#,
        title = title,
        tags = head_tags(ctx),
        schema = json_ld_script(ctx),
        body = body,
    )
}

/// Body for a LocalPage URL that matched no row.
pub fn render_not_found() -> String {
    r#"<!DOCTYPE html>
<html lang="da">
<head>
<meta charset="UTF-8">
<meta name="robots" content="noindex">
<title>Page not found</title>
</head>
<body>
<article class="localseo-page localseo-not-found">
<p>Page not found.</p>
</article>
</body>
</html>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::render::context::tests::{sample_context, sample_page};
    use std::sync::Arc;

    #[test]
    fn test_paragraphs() {
        assert_eq!(paragraphs("a\n\nb & c"), "<p>a</p>\n<p>b &amp; c</p>");
        assert_eq!(paragraphs("  \n\n "), "");
    }

    #[test]
    fn test_render_page() {
        let html = render_page(&sample_context(SiteConfig {
            business_phone: "70 20 30 40".into(),
            ..Default::default()
        }));

        assert!(html.contains("<title>Kloakmester in Dianalund</title>"));
        assert!(html.contains("<h1>Kloakmester i Dianalund – Hurtig hjælp og lokale eksperter</h1>"));
        assert!(html.contains("i hele 4293 Dianalund, samt lokalområder som Sorø, Slagelse, Ruds Vedby."));
        assert!(html.contains(r#"href="tel:70203040""#));
        assert!(html.contains("Filadelfia"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains(r#"rel="canonical""#));
    }

    #[test]
    fn test_render_escapes_row_text() {
        let mut page = sample_page();
        page.city = "<b>Town</b>".into();
        page.zip = String::new();
        let ctx = PageContext::new(page, "/".into(), Arc::new(SiteConfig::default()));
        let html = render_page(&ctx);

        assert!(!html.contains("<b>Town</b>"));
        assert!(html.contains("&lt;b&gt;Town&lt;/b&gt;"));
        assert!(html.contains("og omegn."));
    }

    #[test]
    fn test_not_found_page() {
        let html = render_not_found();
        assert!(html.contains("Page not found."));
        assert!(html.contains("noindex"));
    }
}
