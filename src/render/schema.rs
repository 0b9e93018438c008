//! JSON-LD structured data.

use serde_json::{json, Map, Value};

use crate::render::PageContext;

/// Types that also get an `areaServed` city.
const AREA_SERVED_TYPES: &[&str] = &[
    "LocalBusiness",
    "Service",
    "ProfessionalService",
    "HomeAndConstructionBusiness",
];

/// Structured data for the page, or `None` when disabled or the row lacks
/// a service or city.
pub fn json_ld(ctx: &PageContext) -> Option<Value> {
    let site = ctx.site();
    let (service, city) = (ctx.service(), ctx.city());
    if !site.schema_enabled || service.is_empty() || city.is_empty() {
        return None;
    }

    let canonical = ctx.canonical_url();
    let page = ctx.page();

    let mut schema = Map::new();
    schema.insert("@context".into(), json!("https://schema.org"));
    schema.insert("@type".into(), json!(site.schema_type));
    schema.insert(
        "name".into(),
        json!(format!("{} – {}", site.business_name(), service).trim()),
    );
    schema.insert("url".into(), json!(canonical));

    let description = page.meta_description.trim();
    if !description.is_empty() {
        schema.insert("description".into(), json!(description));
    }
    let og_image = site.og_image.trim();
    if !og_image.is_empty() {
        schema.insert("image".into(), json!(og_image));
    }

    let mut address = json!({
        "@type": "PostalAddress",
        "addressLocality": city,
    });
    let zip = page.zip.trim();
    if !zip.is_empty() {
        address["postalCode"] = json!(zip);
    }
    schema.insert("address".into(), address);

    let phone = site.business_phone.trim();
    if !phone.is_empty() {
        schema.insert("telephone".into(), json!(phone));
    }

    if AREA_SERVED_TYPES.contains(&site.schema_type.as_str()) {
        schema.insert("areaServed".into(), json!({ "@type": "City", "name": city }));
    }

    schema.insert(
        "breadcrumb".into(),
        json!({
            "@type": "BreadcrumbList",
            "itemListElement": [
                {
                    "@type": "ListItem",
                    "position": 1,
                    "name": site.site_name,
                    "item": site.absolute_url("/"),
                },
                {
                    "@type": "ListItem",
                    "position": 2,
                    "name": format!("{} in {}", service, city),
                    "item": canonical,
                },
            ],
        }),
    );

    Some(Value::Object(schema))
}

/// The `<script>` element carrying the structured data, or empty.
pub fn json_ld_script(ctx: &PageContext) -> String {
    let Some(schema) = json_ld(ctx) else {
        return String::new();
    };
    match serde_json::to_string_pretty(&schema) {
        // `</` inside a string must not close the script element
        Ok(body) => format!(
            "<script type=\"application/ld+json\">\n{}\n</script>\n",
            body.replace("</", "<\\/")
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize JSON-LD");
            String::new()
        }
    }
}
