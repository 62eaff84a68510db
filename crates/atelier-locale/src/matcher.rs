//! Paths that bypass locale routing (API routes, framework assets, files).

use regex::{Regex, RegexSet};

use crate::error::LocaleError;

/// Compiled set of exclusion patterns.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    set: RegexSet,
}

impl PathMatcher {
    /// Compile the given patterns.
    ///
    /// Each pattern is checked on its own first so the error names the
    /// offending one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, LocaleError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|e| LocaleError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        }
        let set = RegexSet::new(patterns.iter().map(|p| p.as_ref())).map_err(|e| {
            LocaleError::InvalidPattern {
                pattern: "<set>".to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { set })
    }

    /// Whether the path skips locale routing.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::config::LocaleConfig;

    fn default_matcher() -> PathMatcher {
        PathMatcher::new(&LocaleConfig::default().excluded_patterns).unwrap()
    }

    #[test]
    fn test_default_patterns_exclude_api_and_assets() {
        let m = default_matcher();
        assert!(m.is_excluded("/api"));
        assert!(m.is_excluded("/api/chat"));
        assert!(m.is_excluded("/_next/static/chunks/main.js"));
        assert!(m.is_excluded("/favicon.ico"));
        assert!(m.is_excluded("/images/hero.webp"));
        assert!(m.is_excluded("/robots.txt"));
        assert!(m.is_excluded("/health"));
    }

    #[test]
    fn test_default_patterns_route_pages() {
        let m = default_matcher();
        assert!(!m.is_excluded("/"));
        assert!(!m.is_excluded("/pricing"));
        assert!(!m.is_excluded("/apiary"));
        assert!(!m.is_excluded("/en/services/branding"));
        assert!(!m.is_excluded("/v1.2/notes/"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PathMatcher::new(&["^/ok$", "(unclosed"]).unwrap_err();
        match err {
            LocaleError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_matcher_excludes_nothing() {
        let m = PathMatcher::new::<&str>(&[]).unwrap();
        assert!(m.is_empty());
        assert!(!m.is_excluded("/api/chat"));
    }
}
