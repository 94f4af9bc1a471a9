//! The security evaluator contract
//!
//! A [`SecurityEvaluator`] decides, for a principal and an action, whether an
//! operation is permitted on a graph as a whole and on individual triples.
//! The current principal is ambient: the façade asks the evaluator per call,
//! so one secured graph can serve multiple principals (thread-local or
//! context-passed identity).
//!
//! Check triples may contain [`Node::Any`] wildcards and the two marker
//! nodes below:
//!
//! - [`future_node`]: a resource that will exist once the operation
//!   completes; its identity is irrelevant for Create decisions
//! - [`ignore_node`]: evaluators must treat this position as unconstrained
//!
//! Two implementations ship with the crate: [`OpenEvaluator`] (permit
//! everything) and [`StaticEvaluator`] (table-driven, the building block the
//! test suites configure).

use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use warden_graph::{Node, Triple};

/// Marker IRI for a position the evaluator must disregard
pub const IGNORE_IRI: &str = "urn:x-warden:ignore";

/// Blank label for a resource that does not exist yet
pub const FUTURE_LABEL: &str = "urn:x-warden:future";

/// A node marking an evaluator-ignored position in a check triple
pub fn ignore_node() -> Node {
    Node::iri(IGNORE_IRI)
}

/// A node standing for a not-yet-materialized resource in a check triple
pub fn future_node() -> Node {
    Node::blank(FUTURE_LABEL)
}

/// Identity on whose behalf an operation executes.
///
/// Treated as an equality-only key; the embedding decides what the name
/// means. [`Principal::Anonymous`] is the distinguished unauthenticated
/// principal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Principal {
    /// The unauthenticated principal
    Anonymous,
    /// An authenticated identity
    Named(String),
}

impl Principal {
    /// Create a named principal
    pub fn named(name: impl Into<String>) -> Self {
        Principal::Named(name.into())
    }

    /// True for named principals
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Named(_))
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::Anonymous => write!(f, "<anonymous>"),
            Principal::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The four mediated actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Observe triples or graph structure
    Read,
    /// Change the graph at all
    Update,
    /// Add a specific triple
    Create,
    /// Remove a specific triple
    Delete,
}

/// Decides permission for a principal, action, graph, and optionally a triple.
///
/// Evaluator calls are synchronous and expected to answer in bounded time.
/// Implementations must handle wildcard and marker components in check
/// triples: a wildcard triple asks "may the principal do this to *any*
/// triple of the graph"; [`ignore_node`] positions are unconstrained.
pub trait SecurityEvaluator: Send + Sync {
    /// Graph-level permission
    fn evaluate(&self, principal: &Principal, action: Action, graph: &str) -> bool;

    /// Triple-level permission
    fn evaluate_triple(
        &self,
        principal: &Principal,
        action: Action,
        graph: &str,
        triple: &Triple,
    ) -> bool;

    /// True iff any of `actions` is permitted at graph level
    fn evaluate_any(&self, principal: &Principal, actions: &[Action], graph: &str) -> bool {
        actions.iter().any(|a| self.evaluate(principal, *a, graph))
    }

    /// True iff any of `actions` is permitted on `triple`
    fn evaluate_any_triple(
        &self,
        principal: &Principal,
        actions: &[Action],
        graph: &str,
        triple: &Triple,
    ) -> bool {
        actions
            .iter()
            .any(|a| self.evaluate_triple(principal, *a, graph, triple))
    }

    /// Permission to replace `from` by `to` in one step
    ///
    /// The default decomposes into Delete(from) + Create(to).
    fn evaluate_update(
        &self,
        principal: &Principal,
        graph: &str,
        from: &Triple,
        to: &Triple,
    ) -> bool {
        self.evaluate_triple(principal, Action::Delete, graph, from)
            && self.evaluate_triple(principal, Action::Create, graph, to)
    }

    /// The current principal from ambient context
    fn principal(&self) -> Principal;

    /// Whether `principal` counts as authenticated
    fn is_principal_authenticated(&self, principal: &Principal) -> bool {
        principal.is_authenticated()
    }

    /// True when every check must be made by an authenticated principal
    fn requires_authentication(&self) -> bool {
        false
    }

    /// Denied reads raise when true; return empty results when false
    fn is_hard_read_error(&self) -> bool {
        false
    }
}

/// Evaluator that permits everything.
///
/// The bypass for embeddings that want the façade surface without
/// enforcement; every check short-circuits to allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenEvaluator;

impl SecurityEvaluator for OpenEvaluator {
    fn evaluate(&self, _principal: &Principal, _action: Action, _graph: &str) -> bool {
        true
    }

    fn evaluate_triple(
        &self,
        _principal: &Principal,
        _action: Action,
        _graph: &str,
        _triple: &Triple,
    ) -> bool {
        true
    }

    fn principal(&self) -> Principal {
        Principal::Anonymous
    }

    fn is_principal_authenticated(&self, _principal: &Principal) -> bool {
        true
    }
}

/// Per-action triple rule: receives the principal, the action, and the check
/// triple (which may contain wildcards and marker nodes).
pub type TripleRule = dyn Fn(&Principal, Action, &Triple) -> bool + Send + Sync;

/// Table-driven evaluator.
///
/// Graph-level permission is a set of allowed actions. Triple-level
/// permission defaults to the graph-level answer and can be refined with a
/// [`TripleRule`]. The ambient principal is held behind a lock so tests and
/// multi-tenant embeddings can switch identities on a shared evaluator.
pub struct StaticEvaluator {
    principal: RwLock<Principal>,
    allowed: HashSet<Action>,
    triple_rule: Option<Arc<TripleRule>>,
    hard_read: bool,
    require_auth: bool,
}

impl StaticEvaluator {
    /// Create an evaluator permitting all four actions for `principal`
    pub fn allow_all(principal: Principal) -> Self {
        Self::new(
            principal,
            [Action::Read, Action::Update, Action::Create, Action::Delete],
        )
    }

    /// Create an evaluator permitting exactly `allowed` at graph level
    pub fn new(principal: Principal, allowed: impl IntoIterator<Item = Action>) -> Self {
        Self {
            principal: RwLock::new(principal),
            allowed: allowed.into_iter().collect(),
            triple_rule: None,
            hard_read: false,
            require_auth: false,
        }
    }

    /// Refine triple-level decisions with `rule`
    ///
    /// The rule runs only when the graph-level action is allowed; it cannot
    /// grant what the graph level denies.
    pub fn with_triple_rule(
        mut self,
        rule: impl Fn(&Principal, Action, &Triple) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.triple_rule = Some(Arc::new(rule));
        self
    }

    /// Raise on denied reads instead of returning empty results
    pub fn with_hard_read(mut self, hard: bool) -> Self {
        self.hard_read = hard;
        self
    }

    /// Fail every check from unauthenticated principals
    pub fn with_required_authentication(mut self, required: bool) -> Self {
        self.require_auth = required;
        self
    }

    /// Switch the ambient principal
    pub fn set_principal(&self, principal: Principal) {
        *self.principal.write().expect("principal lock poisoned") = principal;
    }
}

impl SecurityEvaluator for StaticEvaluator {
    fn evaluate(&self, principal: &Principal, action: Action, _graph: &str) -> bool {
        if self.require_auth && !principal.is_authenticated() {
            return false;
        }
        self.allowed.contains(&action)
    }

    fn evaluate_triple(
        &self,
        principal: &Principal,
        action: Action,
        graph: &str,
        triple: &Triple,
    ) -> bool {
        if !self.evaluate(principal, action, graph) {
            return false;
        }
        match &self.triple_rule {
            Some(rule) => rule(principal, action, triple),
            None => true,
        }
    }

    fn principal(&self) -> Principal {
        self.principal
            .read()
            .expect("principal lock poisoned")
            .clone()
    }

    fn requires_authentication(&self) -> bool {
        self.require_auth
    }

    fn is_hard_read_error(&self) -> bool {
        self.hard_read
    }
}

impl std::fmt::Debug for StaticEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticEvaluator")
            .field("principal", &self.principal())
            .field("allowed", &self.allowed)
            .field("has_triple_rule", &self.triple_rule.is_some())
            .field("hard_read", &self.hard_read)
            .field("require_auth", &self.require_auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(o: &str) -> Triple {
        Triple::new(Node::iri("s"), Node::iri("p"), Node::iri(o))
    }

    #[test]
    fn test_open_evaluator_permits_everything() {
        let e = OpenEvaluator;
        let p = Principal::Anonymous;
        assert!(e.evaluate(&p, Action::Delete, "g"));
        assert!(e.evaluate_triple(&p, Action::Create, "g", &Triple::any()));
        assert!(e.is_principal_authenticated(&p));
    }

    #[test]
    fn test_static_graph_level() {
        let e = StaticEvaluator::new(Principal::named("alice"), [Action::Read]);
        let p = e.principal();
        assert!(e.evaluate(&p, Action::Read, "g"));
        assert!(!e.evaluate(&p, Action::Update, "g"));
        assert!(e.evaluate_any(&p, &[Action::Update, Action::Read], "g"));
    }

    #[test]
    fn test_triple_rule_cannot_grant_beyond_graph_level() {
        let e = StaticEvaluator::new(Principal::named("alice"), [Action::Read])
            .with_triple_rule(|_, _, _| true);
        let p = e.principal();
        assert!(!e.evaluate_triple(&p, Action::Create, "g", &t("o")));
        assert!(e.evaluate_triple(&p, Action::Read, "g", &t("o")));
    }

    #[test]
    fn test_triple_rule_refines() {
        let e = StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
            |_, action, triple| !(action == Action::Read && triple.o == Node::iri("secret")),
        );
        let p = e.principal();
        assert!(!e.evaluate_triple(&p, Action::Read, "g", &t("secret")));
        assert!(e.evaluate_triple(&p, Action::Read, "g", &t("public")));
        assert!(e.evaluate_triple(&p, Action::Delete, "g", &t("secret")));
    }

    #[test]
    fn test_required_authentication() {
        let e = StaticEvaluator::allow_all(Principal::Anonymous).with_required_authentication(true);
        let anon = Principal::Anonymous;
        assert!(!e.evaluate(&anon, Action::Read, "g"));
        e.set_principal(Principal::named("alice"));
        let alice = e.principal();
        assert!(e.evaluate(&alice, Action::Read, "g"));
    }

    #[test]
    fn test_default_update_decomposition() {
        let e = StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
            |_, action, triple| !(action == Action::Delete && triple.o == Node::iri("pinned")),
        );
        let p = e.principal();
        assert!(!e.evaluate_update(&p, "g", &t("pinned"), &t("new")));
        assert!(e.evaluate_update(&p, "g", &t("old"), &t("new")));
    }
}
