//! Prefix mapping
//!
//! A shared, interior-mutable map from namespace prefixes to namespace IRIs.
//! Graphs hand out a reference to their mapping; callers mutate it through
//! `&self` methods so the mapping can be shared across façades.

use std::collections::BTreeMap;
use std::sync::RwLock;

/// A prefix-to-namespace mapping with interior mutability.
#[derive(Debug, Default)]
pub struct PrefixMapping {
    inner: RwLock<BTreeMap<String, String>>,
}

impl PrefixMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, replacing any previous binding
    pub fn set_prefix(&self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.inner
            .write()
            .expect("prefix map poisoned")
            .insert(prefix.into(), namespace.into());
    }

    /// Remove the binding for `prefix`, returning the namespace it mapped to
    pub fn remove_prefix(&self, prefix: &str) -> Option<String> {
        self.inner.write().expect("prefix map poisoned").remove(prefix)
    }

    /// The namespace bound to `prefix`
    pub fn get_namespace(&self, prefix: &str) -> Option<String> {
        self.inner
            .read()
            .expect("prefix map poisoned")
            .get(prefix)
            .cloned()
    }

    /// All bindings, sorted by prefix
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.inner
            .read()
            .expect("prefix map poisoned")
            .iter()
            .map(|(p, ns)| (p.clone(), ns.clone()))
            .collect()
    }

    /// Shorten `iri` to `prefix:local` using the longest matching namespace
    pub fn qname_for(&self, iri: &str) -> Option<String> {
        let map = self.inner.read().expect("prefix map poisoned");
        map.iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(p, ns)| format!("{p}:{}", &iri[ns.len()..]))
    }

    /// Expand `prefix:local` to a full IRI
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (prefix, local) = qname.split_once(':')?;
        let ns = self.get_namespace(prefix)?;
        Some(format!("{ns}{local}"))
    }

    /// Copy every binding of `other` into this mapping
    pub fn set_all(&self, other: &PrefixMapping) {
        for (p, ns) in other.bindings() {
            self.set_prefix(p, ns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_round_trip() {
        let pm = PrefixMapping::new();
        pm.set_prefix("ex", "http://example.com/");
        assert_eq!(
            pm.qname_for("http://example.com/thing").as_deref(),
            Some("ex:thing")
        );
        assert_eq!(
            pm.expand("ex:thing").as_deref(),
            Some("http://example.com/thing")
        );
        assert_eq!(pm.expand("nope:thing"), None);
    }

    #[test]
    fn test_longest_namespace_wins() {
        let pm = PrefixMapping::new();
        pm.set_prefix("a", "http://example.com/");
        pm.set_prefix("b", "http://example.com/deep/");
        assert_eq!(
            pm.qname_for("http://example.com/deep/x").as_deref(),
            Some("b:x")
        );
    }

    #[test]
    fn test_remove() {
        let pm = PrefixMapping::new();
        pm.set_prefix("ex", "http://example.com/");
        assert_eq!(pm.remove_prefix("ex").as_deref(), Some("http://example.com/"));
        assert_eq!(pm.get_namespace("ex"), None);
    }
}
