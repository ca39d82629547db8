//! Font-name resolution with subsetting-prefix fallback.

use std::collections::HashMap;

/// Strip a PDF subsetting prefix: `ABCDEF+Inter-Bold` -> `Inter-Bold`.
/// The prefix must be exactly six ASCII uppercase letters and a `+`.
pub fn normalize_font_key(name: &str) -> &str {
    if let Some((prefix, rest)) = name.split_once('+') {
        if prefix.len() == 6 && prefix.bytes().all(|b| b.is_ascii_uppercase()) {
            return rest;
        }
    }
    name
}

/// Two-level font lookup: registered names exactly as embedded, plus their
/// subsetting-normalized aliases. The first registration of a name (or
/// alias) wins; later collisions are ignored.
#[derive(Debug, Default)]
pub struct FontBook {
    exact: HashMap<String, String>,
    normalized: HashMap<String, String>,
}

impl FontBook {
    pub fn new() -> Self {
        FontBook::default()
    }

    /// Record an embedded font name.
    pub fn insert(&mut self, name: &str) {
        self.exact
            .entry(name.to_string())
            .or_insert_with(|| name.to_string());
        let norm = normalize_font_key(name);
        if norm != name {
            self.normalized
                .entry(norm.to_string())
                .or_insert_with(|| name.to_string());
        }
    }

    /// Resolve a configured font name to an embedded one: exact match
    /// first, then via the normalized key (in either direction).
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(found) = self.exact.get(name) {
            return Some(found);
        }
        let key = normalize_font_key(name);
        self.exact
            .get(key)
            .or_else(|| self.normalized.get(key))
            .map(String::as_str)
    }
}
