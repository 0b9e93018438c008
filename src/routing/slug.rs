//! Text to slug normalization.
//!
//! # Algorithm
//! 1. Lowercase
//! 2. Whitespace runs become a single hyphen
//! 3. Anything outside `[a-z0-9-]` is dropped
//! 4. Repeated hyphens collapse, leading/trailing hyphens are trimmed
//!
//! Accented letters are dropped rather than transliterated ("Køge" → "kge").
//! Stored rows and request URLs go through the same function, so lookups stay
//! consistent even though the slug loses those letters.

/// Normalize free text into a URL slug. Pure and total.
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        }
    }

    slug
}

/// Default legacy slug for a (service, city) pair.
pub fn page_slug(service_keyword: &str, city: &str) -> String {
    normalize(&format!("{}-{}", service_keyword, city))
}
