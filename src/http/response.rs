//! Response builders for the public front.
//!
//! # Design Decisions
//! - A LocalPage miss carries no-cache directives so a page created later
//!   is not hidden behind a cached 404
//! - A path the resolver does not own gets a plain 404 with no cache
//!   directives
//! - Redirect targets are percent-encoded where a header value needs it

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::render::render_not_found;

pub const NO_CACHE: &str = "no-cache, must-revalidate, max-age=0";

/// 404 for a LocalPage URL that matched no row.
pub fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        [
            (header::CACHE_CONTROL, NO_CACHE),
            (header::PRAGMA, "no-cache"),
        ],
        Html(render_not_found()),
    )
        .into_response()
}

/// 404 for a path outside the LocalPage URL shapes.
pub fn pass_through() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Escape bytes that cannot appear in a header value.
fn encode_location(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    for byte in target.bytes() {
        if byte.is_ascii_graphic() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// 301 or 302 to `target`. Other codes are sent as 301.
pub fn redirect(target: &str, status: u16) -> Response {
    let status = match status {
        302 => StatusCode::FOUND,
        _ => StatusCode::MOVED_PERMANENTLY,
    };
    match HeaderValue::from_str(&encode_location(target)) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(location = target, error = %e, "Unusable redirect target");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page_headers() {
        let response = not_found_page();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CACHE_CONTROL], NO_CACHE);
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
    }

    #[test]
    fn test_pass_through_has_no_cache_directives() {
        let response = pass_through();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_redirect() {
        let response = redirect("https://x/new", 301);
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "https://x/new");

        assert_eq!(redirect("/a", 302).status(), StatusCode::FOUND);
        assert_eq!(redirect("/a", 307).status(), StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    fn test_redirect_encodes_location() {
        let response = redirect("/by/køge side", 301);
        assert_eq!(response.headers()[header::LOCATION], "/by/k%C3%B8ge%20side");
    }
}
