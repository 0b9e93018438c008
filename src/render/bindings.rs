//! Template field bindings.
//!
//! Binding keys map through a fixed table onto row fields. `phone_url` and
//! `cta_label` are computed from the row and site settings instead.

use crate::render::PageContext;

/// A row field reachable from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    City,
    Zip,
    ServiceKeyword,
    AiIntro,
    MetaTitle,
    MetaDescription,
    Slug,
    NearbyCities,
    LocalLandmarks,
}

/// A parsed binding key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKey {
    Field(Field),
    PhoneUrl,
    CtaLabel,
}

const FIELD_KEYS: &[(&str, Field)] = &[
    ("city", Field::City),
    ("zip", Field::Zip),
    ("service", Field::ServiceKeyword),
    ("service_keyword", Field::ServiceKeyword),
    ("intro", Field::AiIntro),
    ("intro_text", Field::AiIntro),
    ("ai_generated_intro", Field::AiIntro),
    ("meta_title", Field::MetaTitle),
    ("meta_description", Field::MetaDescription),
    ("slug", Field::Slug),
    ("nearby_cities", Field::NearbyCities),
    ("local_landmarks", Field::LocalLandmarks),
];

impl BindingKey {
    /// `None` for keys outside the table.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "phone_url" => Some(BindingKey::PhoneUrl),
            "cta_label" => Some(BindingKey::CtaLabel),
            _ => FIELD_KEYS
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, field)| BindingKey::Field(*field)),
        }
    }
}

fn field_value(ctx: &PageContext, field: Field) -> String {
    let page = ctx.page();
    match field {
        Field::City => page.city.clone(),
        Field::Zip => page.zip.clone(),
        Field::ServiceKeyword => page.service_keyword.clone(),
        Field::AiIntro => page.ai_intro.clone(),
        Field::MetaTitle => page.meta_title.clone(),
        Field::MetaDescription => page.meta_description.clone(),
        Field::Slug => page.slug.clone().unwrap_or_default(),
        Field::NearbyCities => page.nearby_cities.clone(),
        Field::LocalLandmarks => page.local_landmarks.clone(),
    }
}

/// Call-to-action text; names the phone number when one is configured.
pub fn cta_label(ctx: &PageContext) -> String {
    let phone = ctx.site().business_phone.trim();
    if phone.is_empty() {
        "Kontakt os i dag".to_string()
    } else {
        format!("Ring til din lokale ekspert i {} – {}", ctx.city(), phone)
    }
}

pub fn resolve(ctx: &PageContext, key: BindingKey) -> String {
    match key {
        BindingKey::Field(field) => field_value(ctx, field),
        BindingKey::PhoneUrl => ctx.phone_url().unwrap_or_default(),
        BindingKey::CtaLabel => cta_label(ctx),
    }
}

/// Unescaped value for a raw key; unknown keys give an empty string.
pub fn binding_value(ctx: &PageContext, key: &str) -> String {
    BindingKey::parse(key)
        .map(|key| resolve(ctx, key))
        .unwrap_or_default()
}
