//! Placeholder grammar
//!
//! Values may embed references of the form `%(key)s`. The key between
//! `%(` and `)s` is matched non-greedily and taken verbatim.

use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        Regex::new(r"%\((.*?)\)s").expect("placeholder pattern is a valid regex")
    })
}

/// A placeholder occurrence found in a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The full token, e.g. `%(db.host)s`
    pub token: &'a str,
    /// The referenced key, e.g. `db.host`
    pub key: &'a str,
}

/// Find every placeholder in a value, left to right
///
/// Repeated tokens are returned once per occurrence.
pub fn scan(value: &str) -> Vec<Placeholder<'_>> {
    pattern()
        .captures_iter(value)
        .filter_map(|caps| {
            let token = caps.get(0)?.as_str();
            let key = caps.get(1)?.as_str();
            Some(Placeholder { token, key })
        })
        .collect()
}

/// Check if a value contains any placeholder
pub fn contains_placeholder(value: &str) -> bool {
    pattern().is_match(value)
}
