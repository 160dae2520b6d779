//! Placeholder resolution
//!
//! A lookup joins its key parts with `.` and fetches the raw value from the
//! [`Store`]. Every `%(key)s` token in that value is resolved recursively
//! against the flat namespace, using the inner text verbatim as the full
//! composite key. Resolution is best-effort: a token that cannot be resolved
//! stays in the output as literal text.
//!
//! Each resolved token replaces only its first remaining occurrence in the
//! value. Repeated tokens are scanned once per occurrence, so every copy of a
//! resolvable token is eventually replaced.
//!
//! A placeholder that refers back to a key already being resolved is left
//! literal and logged, so cyclic references terminate.

use crate::error::{Error, Result};
use crate::placeholder;
use crate::store::Store;
use indexmap::IndexMap;

/// Resolves keys and their placeholders against a store
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a Store,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a store
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Resolve the key formed by joining `key_parts` with `.`
    ///
    /// `["db", "host"]` looks up `db.host`; `["", "name"]` looks up the
    /// unsectioned `.name`.
    pub fn resolve<S: AsRef<str>>(&self, key_parts: &[S]) -> Result<String> {
        let key = key_parts
            .iter()
            .map(|part| part.as_ref())
            .collect::<Vec<_>>()
            .join(".");

        let mut resolution_stack = Vec::new();
        self.resolve_key(&key, &mut resolution_stack)
    }

    /// Resolve every key in the store, in store order
    pub fn resolve_all(&self) -> Result<IndexMap<String, String>> {
        self.store
            .keys()
            .map(|key| {
                let mut resolution_stack = Vec::new();
                Ok((key.to_string(), self.resolve_key(key, &mut resolution_stack)?))
            })
            .collect()
    }

    fn resolve_key(&self, key: &str, resolution_stack: &mut Vec<String>) -> Result<String> {
        let raw = self
            .store
            .get(key)
            .ok_or_else(|| Error::key_not_found(key))?;

        if !placeholder::contains_placeholder(raw) {
            return Ok(raw.to_string());
        }
        let placeholders = placeholder::scan(raw);

        resolution_stack.push(key.to_string());
        let mut value = raw.to_string();

        for found in placeholders {
            if resolution_stack.iter().any(|k| k == found.key) {
                let mut chain = resolution_stack.clone();
                chain.push(found.key.to_string());
                log::warn!(
                    "Circular placeholder {} left unresolved (chain: {})",
                    found.token,
                    chain.join(" → ")
                );
                continue;
            }

            match self.resolve_key(found.key, resolution_stack) {
                Ok(resolved) => value = value.replacen(found.token, &resolved, 1),
                Err(e) => log::trace!("Placeholder {} in '{}' left as is: {}", found.token, key, e),
            }
        }

        resolution_stack.pop();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::{parse, ParseOptions};
    use pretty_assertions::assert_eq;

    fn store(raw: &str) -> Store {
        parse(raw, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_resolve_section_reference() {
        let store = store("[db]\nhost = localhost\nurl = %(db.host)s:5432\n");
        let resolver = Resolver::new(&store);

        assert_eq!(resolver.resolve(&["db", "host"]).unwrap(), "localhost");
        assert_eq!(resolver.resolve(&["db", "url"]).unwrap(), "localhost:5432");
    }

    #[test]
    fn test_resolve_plain_value_unchanged() {
        let store = store("[a]\nk = 100% plain (really)\n");
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve(&["a", "k"]).unwrap(), "100% plain (really)");
    }

    #[test]
    fn test_resolve_single_part_is_verbatim_key() {
        let store = store("name = top\n[db]\nhost = h\n");
        let resolver = Resolver::new(&store);

        assert_eq!(resolver.resolve(&["db.host"]).unwrap(), "h");
        assert_eq!(resolver.resolve(&["", "name"]).unwrap(), "top");
        assert!(resolver.resolve(&["name"]).is_err());
    }

    #[test]
    fn test_resolve_missing_key() {
        let store = store("[db]\nhost = h\n");
        let err = Resolver::new(&store).resolve(&["db", "port"]).unwrap_err();

        assert_eq!(err.kind, ErrorKind::KeyNotFound);
        assert_eq!(err.path, Some("db.port".into()));
    }

    #[test]
    fn test_unresolvable_placeholder_left_literal() {
        let store = store("[a]\nk = %(missing)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["a", "k"]).unwrap(), "%(missing)s");
    }

    #[test]
    fn test_placeholders_are_not_section_qualified() {
        // `host` is only reachable as `db.host`, so the bare reference stays literal
        let store = store("[db]\nhost = h\nurl = %(host)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["db", "url"]).unwrap(), "%(host)s");
    }

    #[test]
    fn test_unsectioned_reference_uses_leading_dot() {
        let store = store("root = /srv\n[paths]\ndata = %(.root)s/data\n");
        assert_eq!(
            Resolver::new(&store).resolve(&["paths", "data"]).unwrap(),
            "/srv/data"
        );
    }

    #[test]
    fn test_recursive_resolution() {
        let store = store("[a]\nx = 1\ny = %(a.x)s-2\nz = %(a.y)s-3\n");
        assert_eq!(Resolver::new(&store).resolve(&["a", "z"]).unwrap(), "1-2-3");
    }

    #[test]
    fn test_mixed_resolved_and_unresolved() {
        let store = store("[a]\nx = 1\ny = %(a.x)s/%(a.nope)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["a", "y"]).unwrap(), "1/%(a.nope)s");
    }

    #[test]
    fn test_repeated_token_each_occurrence_replaced() {
        let store = store("[a]\nx = v\ny = %(a.x)s-%(a.x)s-%(a.x)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["a", "y"]).unwrap(), "v-v-v");
    }

    #[test]
    fn test_replacement_is_first_occurrence_only() {
        // `a.x` resolves to text containing its own token, so the second pass
        // finds that injected copy first and the raw second token stays.
        let store = store("[a]\nx = <%(a.x)s>\ny = %(a.x)s %(a.x)s\n");
        let resolver = Resolver::new(&store);

        assert_eq!(resolver.resolve(&["a", "x"]).unwrap(), "<%(a.x)s>");
        assert_eq!(resolver.resolve(&["a", "y"]).unwrap(), "<<%(a.x)s>> %(a.x)s");
    }

    #[test]
    fn test_continuation_value_resolved() {
        let store = store("[a]\nx = v\nmulti = first\n\t%(a.x)s\n");
        assert_eq!(
            Resolver::new(&store).resolve(&["a", "multi"]).unwrap(),
            "first\n\tv"
        );
    }

    #[test]
    fn test_cycle_terminates_with_literal() {
        let store = store("[c]\na = %(c.b)s\nb = %(c.a)s\n");
        let resolver = Resolver::new(&store);

        assert_eq!(resolver.resolve(&["c", "a"]).unwrap(), "%(c.a)s");
        assert_eq!(resolver.resolve(&["c", "b"]).unwrap(), "%(c.b)s");
    }

    #[test]
    fn test_self_reference_terminates() {
        let store = store("[c]\na = x%(c.a)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["c", "a"]).unwrap(), "x%(c.a)s");
    }

    #[test]
    fn test_shared_reference_is_not_a_cycle() {
        let store = store("[d]\nbase = b\nl = %(d.base)s\nr = %(d.base)s\ntop = %(d.l)s+%(d.r)s\n");
        assert_eq!(Resolver::new(&store).resolve(&["d", "top"]).unwrap(), "b+b");
    }

    #[test]
    fn test_resolve_all() {
        let store = store("[db]\nhost = h\nurl = %(db.host)s:1\n");
        let all = Resolver::new(&store).resolve_all().unwrap();

        assert_eq!(
            all.into_iter().collect::<Vec<_>>(),
            vec![
                ("db.host".to_string(), "h".to_string()),
                ("db.url".to_string(), "h:1".to_string()),
            ]
        );
    }
}
