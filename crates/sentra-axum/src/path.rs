//! Allow-list path matching
//!
//! Patterns are either exact (`/api/auth/login`) or prefix globs ending in
//! `/**` (`/actuator/**`, matching the bare prefix too). Matching is a pure
//! string check per request.

/// Compiled allow-list matcher
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl PathMatcher {
    /// Compile an allow list from patterns
    pub fn new<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut exact = Vec::new();
        let mut prefixes = Vec::new();
        for pattern in patterns {
            let pattern = pattern.into();
            if let Some(prefix) = pattern.strip_suffix("/**") {
                prefixes.push(prefix.to_string());
            } else {
                exact.push(pattern);
            }
        }
        Self { exact, prefixes }
    }

    /// Whether the request path is allow-listed
    pub fn matches(&self, path: &str) -> bool {
        if self.exact.iter().any(|p| p == path) {
            return true;
        }
        self.prefixes.iter().any(|prefix| {
            path == prefix || path.strip_prefix(prefix.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
