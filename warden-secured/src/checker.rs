//! Canonical permission checks
//!
//! [`PermissionChecker`] binds an evaluator to a graph IRI and exposes the
//! check vocabulary the façades speak: `check_*` raises a typed denial,
//! `can_*` answers without raising. Checks are fail-closed; a failing check
//! raises before any side effect.
//!
//! `check_read` carries the soft/hard distinction: `Ok(true)` means the graph
//! is readable, `Ok(false)` means a soft-mode evaluator denied the read (the
//! caller returns an empty result), and `Err(ReadDenied)` is the hard-mode
//! denial.

use crate::error::{AccessError, Result};
use crate::evaluator::{Action, Principal, SecurityEvaluator};
use std::sync::Arc;
use tracing::debug;
use warden_graph::Triple;

/// Check helpers for one evaluator/graph pair.
#[derive(Clone)]
pub struct PermissionChecker {
    evaluator: Arc<dyn SecurityEvaluator>,
    graph_iri: String,
}

impl PermissionChecker {
    /// Bind `evaluator` to the graph identified by `graph_iri`
    pub fn new(evaluator: Arc<dyn SecurityEvaluator>, graph_iri: impl Into<String>) -> Self {
        Self {
            evaluator,
            graph_iri: graph_iri.into(),
        }
    }

    /// The graph IRI checks run against
    pub fn graph_iri(&self) -> &str {
        &self.graph_iri
    }

    /// The bound evaluator
    pub fn evaluator(&self) -> &Arc<dyn SecurityEvaluator> {
        &self.evaluator
    }

    /// The ambient principal, after the authentication gate
    ///
    /// Fails with `AuthenticationRequired` before any authorization outcome
    /// when the evaluator demands authentication and the principal is
    /// anonymous.
    pub fn principal(&self) -> Result<Principal> {
        let principal = self.evaluator.principal();
        if self.evaluator.requires_authentication()
            && !self.evaluator.is_principal_authenticated(&principal)
        {
            debug!(graph = %self.graph_iri, "authentication required");
            return Err(AccessError::AuthenticationRequired);
        }
        Ok(principal)
    }

    // ------------------------------------------------------------------
    // graph-level
    // ------------------------------------------------------------------

    /// Graph-level Read permission, without raising
    pub fn can_read(&self) -> Result<bool> {
        let p = self.principal()?;
        Ok(self.evaluator.evaluate(&p, Action::Read, &self.graph_iri))
    }

    /// Graph-level Read gate
    ///
    /// `Ok(true)`: readable. `Ok(false)`: soft-mode denial, return empty.
    /// `Err(ReadDenied)`: hard-mode denial.
    pub fn check_read(&self) -> Result<bool> {
        if self.can_read()? {
            return Ok(true);
        }
        if self.evaluator.is_hard_read_error() {
            debug!(graph = %self.graph_iri, "read denied (hard)");
            return Err(AccessError::read_denied(&self.graph_iri));
        }
        Ok(false)
    }

    /// Graph-level Update permission, without raising
    pub fn can_update(&self) -> Result<bool> {
        let p = self.principal()?;
        Ok(self
            .evaluator
            .evaluate(&p, Action::Update, &self.graph_iri))
    }

    /// Graph-level Update gate; raises `UpdateDenied`
    pub fn check_update(&self) -> Result<()> {
        if self.can_update()? {
            Ok(())
        } else {
            debug!(graph = %self.graph_iri, "update denied");
            Err(AccessError::update_denied(&self.graph_iri))
        }
    }

    // ------------------------------------------------------------------
    // triple-level
    // ------------------------------------------------------------------

    /// Triple-level Read permission, without raising
    pub fn can_read_triple(&self, triple: &Triple) -> Result<bool> {
        let p = self.principal()?;
        Ok(self
            .evaluator
            .evaluate_triple(&p, Action::Read, &self.graph_iri, triple))
    }

    /// Triple-level Read gate; raises `ReadDenied` carrying the triple
    pub fn check_read_triple(&self, triple: &Triple) -> Result<()> {
        if self.can_read_triple(triple)? {
            Ok(())
        } else {
            debug!(graph = %self.graph_iri, triple = %triple, "triple read denied");
            Err(AccessError::read_denied_triple(
                &self.graph_iri,
                triple.clone(),
            ))
        }
    }

    /// Triple-level Create permission, without raising
    pub fn can_create(&self, triple: &Triple) -> Result<bool> {
        let p = self.principal()?;
        Ok(self
            .evaluator
            .evaluate_triple(&p, Action::Create, &self.graph_iri, triple))
    }

    /// Triple-level Create gate; raises `AddDenied` carrying the triple
    pub fn check_create(&self, triple: &Triple) -> Result<()> {
        if self.can_create(triple)? {
            Ok(())
        } else {
            debug!(graph = %self.graph_iri, triple = %triple, "create denied");
            Err(AccessError::add_denied(&self.graph_iri, triple.clone()))
        }
    }

    /// Triple-level Delete permission, without raising
    pub fn can_delete(&self, triple: &Triple) -> Result<bool> {
        let p = self.principal()?;
        Ok(self
            .evaluator
            .evaluate_triple(&p, Action::Delete, &self.graph_iri, triple))
    }

    /// Triple-level Delete gate; raises `DeleteDenied` carrying the triple
    pub fn check_delete(&self, triple: &Triple) -> Result<()> {
        if self.can_delete(triple)? {
            Ok(())
        } else {
            debug!(graph = %self.graph_iri, triple = %triple, "delete denied");
            Err(AccessError::delete_denied(&self.graph_iri, triple.clone()))
        }
    }

    /// Permission to replace `from` by `to` atomically
    pub fn can_replace(&self, from: &Triple, to: &Triple) -> Result<bool> {
        let p = self.principal()?;
        Ok(self
            .evaluator
            .evaluate_update(&p, &self.graph_iri, from, to))
    }

    // ------------------------------------------------------------------
    // wildcard shorthands
    // ------------------------------------------------------------------

    /// May the principal read any triple whatsoever
    ///
    /// When true, per-element filtering is unnecessary and iterators pass
    /// through.
    pub fn can_read_any(&self) -> Result<bool> {
        self.can_read_triple(&Triple::any())
    }

    /// May the principal delete any triple whatsoever
    pub fn can_delete_any(&self) -> Result<bool> {
        self.can_delete(&Triple::any())
    }
}

impl std::fmt::Debug for PermissionChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionChecker")
            .field("graph", &self.graph_iri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StaticEvaluator;
    use warden_graph::Node;

    fn t(o: &str) -> Triple {
        Triple::new(Node::iri("s"), Node::iri("p"), Node::iri(o))
    }

    #[test]
    fn test_soft_read_returns_false() {
        let e = Arc::new(StaticEvaluator::new(Principal::named("alice"), []));
        let c = PermissionChecker::new(e, "http://e/g");
        assert!(!c.check_read().unwrap());
    }

    #[test]
    fn test_hard_read_raises() {
        let e = Arc::new(
            StaticEvaluator::new(Principal::named("alice"), []).with_hard_read(true),
        );
        let c = PermissionChecker::new(e, "http://e/g");
        assert!(matches!(
            c.check_read(),
            Err(AccessError::ReadDenied { triple: None, .. })
        ));
    }

    #[test]
    fn test_authentication_gate_precedes_authorization() {
        let e = Arc::new(
            StaticEvaluator::allow_all(Principal::Anonymous).with_required_authentication(true),
        );
        let c = PermissionChecker::new(e.clone(), "http://e/g");
        assert!(matches!(
            c.check_read(),
            Err(AccessError::AuthenticationRequired)
        ));
        assert!(matches!(
            c.check_create(&t("o")),
            Err(AccessError::AuthenticationRequired)
        ));

        e.set_principal(Principal::named("alice"));
        assert!(c.check_read().unwrap());
        c.check_create(&t("o")).unwrap();
    }

    #[test]
    fn test_denials_carry_triple() {
        let e = Arc::new(StaticEvaluator::new(
            Principal::named("alice"),
            [Action::Update],
        ));
        let c = PermissionChecker::new(e, "http://e/g");
        c.check_update().unwrap();
        match c.check_create(&t("o")) {
            Err(AccessError::AddDenied { triple, .. }) => assert_eq!(triple, t("o")),
            other => panic!("expected AddDenied, got {other:?}"),
        }
        match c.check_delete(&t("o")) {
            Err(AccessError::DeleteDenied { triple, .. }) => assert_eq!(triple, t("o")),
            other => panic!("expected DeleteDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_wildcard_shorthands() {
        let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
            |_, _, triple| triple.is_concrete(),
        ));
        let c = PermissionChecker::new(e, "http://e/g");
        assert!(!c.can_read_any().unwrap());
        assert!(!c.can_delete_any().unwrap());
        assert!(c.can_read_triple(&t("o")).unwrap());
    }
}
