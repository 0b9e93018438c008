//! URL shape matching.
//!
//! # Responsibilities
//! - Recognize the canonical `/service/{service}/{city}/` shape
//! - Recognize the legacy `/localseo/{slug}/` shape
//! - Capture the dynamic segments verbatim
//!
//! # Design Decisions
//! - Segment matching only, no regex
//! - Prefixes are case-sensitive, captured segments are not altered
//! - At most one trailing slash is accepted; empty segments never match

use std::fmt::Debug;

/// Which URL shape a path matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Canonical { service: &'a str, city: &'a str },
    Legacy { slug: &'a str },
}

/// A fixed prefix followed by a fixed number of captured segments.
pub trait PathPattern: Send + Sync + Debug {
    /// Returns the match when `path` has this shape.
    fn match_path<'a>(&self, path: &'a str) -> Option<RouteMatch<'a>>;
}

/// Split `/{prefix}/{seg}/.../` into its captured segments when the prefix
/// and segment count agree.
fn capture<'a>(path: &'a str, prefix: &str, arity: usize) -> Option<Vec<&'a str>> {
    let rest = path.strip_prefix('/')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    let mut segments = rest.split('/');
    if segments.next()? != prefix {
        return None;
    }

    let captured: Vec<&str> = segments.collect();
    if captured.len() != arity || captured.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(captured)
}

/// `/service/{service}/{city}/`
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalPattern;

impl PathPattern for CanonicalPattern {
    fn match_path<'a>(&self, path: &'a str) -> Option<RouteMatch<'a>> {
        match capture(path, "service", 2)?.as_slice() {
            &[service, city] => Some(RouteMatch::Canonical { service, city }),
            _ => None,
        }
    }
}

/// `/localseo/{slug}/`
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPattern;

impl PathPattern for LegacyPattern {
    fn match_path<'a>(&self, path: &'a str) -> Option<RouteMatch<'a>> {
        match capture(path, "localseo", 1)?.as_slice() {
            &[slug] => Some(RouteMatch::Legacy { slug }),
            _ => None,
        }
    }
}

/// Ordered set of patterns; the first one that matches wins.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<Box<dyn PathPattern>>,
}

impl PatternSet {
    pub fn new(patterns: Vec<Box<dyn PathPattern>>) -> Self {
        Self { patterns }
    }

    pub fn match_path<'a>(&self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.patterns.iter().find_map(|p| p.match_path(path))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(vec![Box::new(CanonicalPattern), Box::new(LegacyPattern)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pattern() {
        let p = CanonicalPattern;
        assert_eq!(
            p.match_path("/service/kloakmester/dianalund/"),
            Some(RouteMatch::Canonical { service: "kloakmester", city: "dianalund" })
        );
        assert_eq!(
            p.match_path("/service/kloakmester/dianalund"),
            Some(RouteMatch::Canonical { service: "kloakmester", city: "dianalund" })
        );
        // captured verbatim
        assert_eq!(
            p.match_path("/service/VVS/K%C3%B8ge/"),
            Some(RouteMatch::Canonical { service: "VVS", city: "K%C3%B8ge" })
        );
    }

    #[test]
    fn test_canonical_rejects_other_shapes() {
        let p = CanonicalPattern;
        assert_eq!(p.match_path("/service/kloakmester/"), None);
        assert_eq!(p.match_path("/service/a/b/c/"), None);
        assert_eq!(p.match_path("/service//b/"), None);
        assert_eq!(p.match_path("/service/a/b//"), None);
        assert_eq!(p.match_path("/Service/a/b/"), None);
        assert_eq!(p.match_path("service/a/b/"), None);
        assert_eq!(p.match_path("/services/a/b/"), None);
    }

    #[test]
    fn test_legacy_pattern() {
        let p = LegacyPattern;
        assert_eq!(
            p.match_path("/localseo/kloakmester-dianalund/"),
            Some(RouteMatch::Legacy { slug: "kloakmester-dianalund" })
        );
        assert_eq!(
            p.match_path("/localseo/kloakmester-dianalund"),
            Some(RouteMatch::Legacy { slug: "kloakmester-dianalund" })
        );
        assert_eq!(p.match_path("/localseo/"), None);
        assert_eq!(p.match_path("/localseo/a/b/"), None);
    }

    #[test]
    fn test_pattern_set_order() {
        let set = PatternSet::default();
        assert!(matches!(set.match_path("/service/a/b/"), Some(RouteMatch::Canonical { .. })));
        assert!(matches!(set.match_path("/localseo/a/"), Some(RouteMatch::Legacy { .. })));
        assert_eq!(set.match_path("/about-us/"), None);
        assert_eq!(set.match_path("/"), None);
    }
}
