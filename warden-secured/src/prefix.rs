//! The secured prefix-mapping façade
//!
//! Namespace reads require graph Read (soft-mode denial returns nothing);
//! namespace writes require graph Update. The façade shares the base graph's
//! mapping by reference and is created lazily by [`crate::SecuredGraph`].

use crate::checker::PermissionChecker;
use crate::error::Result;
use std::sync::Arc;
use warden_graph::Graph;

/// Permission-checked view of a graph's prefix mapping.
pub struct SecuredPrefixMapping {
    checker: PermissionChecker,
    base: Arc<dyn Graph>,
}

impl SecuredPrefixMapping {
    pub(crate) fn new(checker: PermissionChecker, base: Arc<dyn Graph>) -> Self {
        Self { checker, base }
    }

    /// The namespace bound to `prefix`
    pub fn get_namespace(&self, prefix: &str) -> Result<Option<String>> {
        if !self.checker.check_read()? {
            return Ok(None);
        }
        Ok(self.base.prefix_mapping().get_namespace(prefix))
    }

    /// All bindings, sorted by prefix
    pub fn bindings(&self) -> Result<Vec<(String, String)>> {
        if !self.checker.check_read()? {
            return Ok(Vec::new());
        }
        Ok(self.base.prefix_mapping().bindings())
    }

    /// Shorten `iri` using the bound namespaces
    pub fn qname_for(&self, iri: &str) -> Result<Option<String>> {
        if !self.checker.check_read()? {
            return Ok(None);
        }
        Ok(self.base.prefix_mapping().qname_for(iri))
    }

    /// Expand `prefix:local` to a full IRI
    pub fn expand(&self, qname: &str) -> Result<Option<String>> {
        if !self.checker.check_read()? {
            return Ok(None);
        }
        Ok(self.base.prefix_mapping().expand(qname))
    }

    /// Bind `prefix` to `namespace`; requires Update
    pub fn set_prefix(&self, prefix: &str, namespace: &str) -> Result<()> {
        self.checker.check_update()?;
        self.base.prefix_mapping().set_prefix(prefix, namespace);
        Ok(())
    }

    /// Remove the binding for `prefix`; requires Update
    pub fn remove_prefix(&self, prefix: &str) -> Result<Option<String>> {
        self.checker.check_update()?;
        Ok(self.base.prefix_mapping().remove_prefix(prefix))
    }
}

impl std::fmt::Debug for SecuredPrefixMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredPrefixMapping")
            .field("graph", &self.checker.graph_iri())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::evaluator::{Action, Principal, StaticEvaluator};
    use crate::SecuredGraph;
    use warden_graph::MemGraph;

    fn graph_with_prefix(evaluator: Arc<StaticEvaluator>) -> SecuredGraph {
        let base = MemGraph::new("http://e/g");
        base.prefix_mapping().set_prefix("ex", "http://example.com/");
        SecuredGraph::new(evaluator, Arc::new(base))
    }

    #[test]
    fn test_reads_require_read() {
        let g = graph_with_prefix(Arc::new(StaticEvaluator::new(
            Principal::named("alice"),
            [Action::Update],
        )));
        let pm = g.prefix_mapping();
        assert_eq!(pm.get_namespace("ex").unwrap(), None);
        assert!(pm.bindings().unwrap().is_empty());
    }

    #[test]
    fn test_writes_require_update() {
        let g = graph_with_prefix(Arc::new(StaticEvaluator::new(
            Principal::named("alice"),
            [Action::Read],
        )));
        let pm = g.prefix_mapping();
        assert_eq!(
            pm.get_namespace("ex").unwrap().as_deref(),
            Some("http://example.com/")
        );
        assert!(matches!(
            pm.set_prefix("ex2", "http://example.org/"),
            Err(AccessError::UpdateDenied { .. })
        ));
    }

    #[test]
    fn test_qname_round_trip() {
        let g = graph_with_prefix(Arc::new(StaticEvaluator::allow_all(Principal::named(
            "alice",
        ))));
        let pm = g.prefix_mapping();
        pm.set_prefix("ex2", "http://example.org/").unwrap();
        assert_eq!(
            pm.qname_for("http://example.org/x").unwrap().as_deref(),
            Some("ex2:x")
        );
        assert_eq!(
            pm.expand("ex:y").unwrap().as_deref(),
            Some("http://example.com/y")
        );
    }
}
