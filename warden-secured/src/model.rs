//! The secured model façade
//!
//! [`SecuredModel`] composes the secured graph with the statement-level
//! operations of [`Model`]: bulk add/remove, containment over readable
//! statements, set operations on the readable projection, property lookup,
//! reification, RDF lists, and N-Triples read/write.
//!
//! Bulk mutations pre-check every element before the first one is applied,
//! so a denial leaves the base unchanged. Set operations and serialization
//! never see triples the principal may not read.

use crate::checker::PermissionChecker;
use crate::error::{AccessError, Result};
use crate::evaluator::{future_node, ignore_node, SecurityEvaluator};
use crate::graph::SecuredGraph;
use crate::iter::SecuredTripleIter;
use crate::prefix::SecuredPrefixMapping;
use std::collections::HashSet;
use std::sync::Arc;
use warden_graph::{
    reification_quad, Graph, Literal, Model, Node, Selector, Statement, Triple,
};
use warden_vocab::rdf;

/// Statement view over a filtered triple iterator.
pub struct SecuredStatementIter<'a> {
    inner: SecuredTripleIter<'a>,
}

impl Iterator for SecuredStatementIter<'_> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        for t in self.inner.by_ref() {
            if let Ok(stmt) = Statement::from_triple(t) {
                return Some(stmt);
            }
        }
        None
    }
}

impl SecuredStatementIter<'_> {
    /// Release the underlying iterator without waiting for drop
    pub fn close(&mut self) {
        self.inner.close()
    }
}

/// Per-statement, per-operation access control over a base model.
pub struct SecuredModel {
    graph: SecuredGraph,
    base: Model,
}

impl SecuredModel {
    /// Wrap the graph behind `base`, mediating through `evaluator`
    pub fn new(evaluator: Arc<dyn SecurityEvaluator>, base: Arc<dyn Graph>) -> Self {
        Self {
            graph: SecuredGraph::new(evaluator, Arc::clone(&base)),
            base: Model::new(base),
        }
    }

    /// Wrap an existing model
    pub fn wrap(evaluator: Arc<dyn SecurityEvaluator>, model: &Model) -> Self {
        Self::new(evaluator, Arc::clone(model.graph()))
    }

    /// The secured graph this model is built on
    pub fn graph(&self) -> &SecuredGraph {
        &self.graph
    }

    /// The graph IRI
    pub fn graph_iri(&self) -> &str {
        self.graph.graph_iri()
    }

    pub(crate) fn checker(&self) -> &PermissionChecker {
        self.graph.checker()
    }

    // ------------------------------------------------------------------
    // add / remove
    // ------------------------------------------------------------------

    /// Add one statement: Update on the graph, Create on the triple
    pub fn add(&self, stmt: &Statement) -> Result<()> {
        self.graph.add(stmt.as_triple().clone())
    }

    /// Add statements with at-most-once, fail-closed semantics
    ///
    /// Every element is checked before any is applied; a single denial
    /// aborts the whole batch.
    pub fn add_all(&self, stmts: &[Statement]) -> Result<()> {
        self.checker().check_update()?;
        for s in stmts {
            self.checker().check_create(s.as_triple())?;
        }
        for s in stmts {
            self.base.add(s)?;
        }
        Ok(())
    }

    /// Add every statement of another model, fail-closed
    pub fn add_model(&self, other: &Model) -> Result<()> {
        self.add_all(&other.statements()?)
    }

    /// Remove one statement: Update on the graph, Delete on the triple
    pub fn remove(&self, stmt: &Statement) -> Result<()> {
        self.graph.delete(stmt.as_triple())
    }

    /// Remove statements with fail-closed semantics
    pub fn remove_all(&self, stmts: &[Statement]) -> Result<()> {
        self.checker().check_update()?;
        for s in stmts {
            self.checker().check_delete(s.as_triple())?;
        }
        for s in stmts {
            self.base.remove(s)?;
        }
        Ok(())
    }

    /// Remove every statement of another model, fail-closed
    pub fn remove_model(&self, other: &Model) -> Result<()> {
        self.remove_all(&other.statements()?)
    }

    // ------------------------------------------------------------------
    // containment
    // ------------------------------------------------------------------

    /// True when the statement is present and readable
    pub fn contains(&self, stmt: &Statement) -> Result<bool> {
        self.graph.contains(stmt.as_triple())
    }

    /// True when a readable statement matches the pattern
    pub fn contains_matching(&self, pattern: &Triple) -> Result<bool> {
        self.graph.contains(pattern)
    }

    /// True when every statement of `other` is present and readable
    pub fn contains_all(&self, other: &Model) -> Result<bool> {
        if !self.checker().check_read()? {
            return Ok(false);
        }
        if self.checker().can_read_any()? {
            return Ok(self.base.contains_all(other)?);
        }
        for s in other.statements()? {
            if !self.base.contains(&s)? || !self.checker().can_read_triple(s.as_triple())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when at least one statement of `other` is present and readable
    ///
    /// When nothing in `other` is readable, this is `false`, not an error.
    pub fn contains_any(&self, other: &Model) -> Result<bool> {
        if !self.checker().check_read()? {
            return Ok(false);
        }
        if self.checker().can_read_any()? {
            return Ok(self.base.contains_any(other)?);
        }
        for s in other.statements()? {
            if self.base.contains(&s)? && self.checker().can_read_triple(s.as_triple())? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when a readable triple mentions `node` in any position
    pub fn contains_resource(&self, node: &Node) -> Result<bool> {
        if !self.checker().check_read()? {
            return Ok(false);
        }
        for pattern in warden_graph::mention_patterns(node) {
            if self.graph.contains(&pattern)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when `(s, p, value)` is present and readable
    pub fn contains_literal(
        &self,
        s: &Node,
        p: &Node,
        value: impl Into<Literal>,
    ) -> Result<bool> {
        self.graph
            .contains(&Triple::new(s.clone(), p.clone(), Node::literal(value)))
    }

    // ------------------------------------------------------------------
    // listing
    // ------------------------------------------------------------------

    /// Every readable statement
    pub fn list_statements(&self) -> Result<SecuredStatementIter<'_>> {
        self.list_statements_matching(&Triple::any())
    }

    /// Readable statements matching a pattern
    pub fn list_statements_matching(
        &self,
        pattern: &Triple,
    ) -> Result<SecuredStatementIter<'_>> {
        Ok(SecuredStatementIter {
            inner: self.graph.find(pattern)?,
        })
    }

    fn distinct_nodes(
        &self,
        pattern: &Triple,
        project: impl Fn(Triple) -> Node,
    ) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for t in self.graph.find(pattern)? {
            let n = project(t);
            if seen.insert(n.clone()) {
                out.push(n);
            }
        }
        Ok(out)
    }

    /// Distinct subjects backed by at least one readable triple
    pub fn list_subjects(&self) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::any(), |t| t.s)
    }

    /// Distinct objects backed by at least one readable triple
    pub fn list_objects(&self) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::any(), |t| t.o)
    }

    /// Distinct objects of readable `(_, p, _)` triples
    pub fn list_objects_of_property(&self, p: &Node) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::new(Node::Any, p.clone(), Node::Any), |t| t.o)
    }

    /// Distinct objects of readable `(s, p, _)` triples
    pub fn list_objects_of_property_for(&self, s: &Node, p: &Node) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::new(s.clone(), p.clone(), Node::Any), |t| t.o)
    }

    /// Distinct subjects of readable `(_, p, _)` triples
    pub fn list_subjects_with_property(&self, p: &Node) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::new(Node::Any, p.clone(), Node::Any), |t| t.s)
    }

    /// Distinct subjects of readable `(_, p, o)` triples
    pub fn list_subjects_with_property_value(&self, p: &Node, o: &Node) -> Result<Vec<Node>> {
        self.distinct_nodes(&Triple::new(Node::Any, p.clone(), o.clone()), |t| t.s)
    }

    /// Distinct resources with at least one readable `(_, p, _)` triple
    pub fn list_resources_with_property(&self, p: &Node) -> Result<Vec<Node>> {
        self.list_subjects_with_property(p)
    }

    // ------------------------------------------------------------------
    // set operations
    // ------------------------------------------------------------------

    /// Readable statements of self plus the full content of `other`
    pub fn union(&self, other: &Model) -> Result<Model> {
        if !self.checker().check_read()? {
            return Ok(other.union(&Model::mem(self.graph_iri()))?);
        }
        Ok(self.readable_model()?.union(other)?)
    }

    /// Readable statements of self present in `other`
    pub fn intersection(&self, other: &Model) -> Result<Model> {
        if !self.checker().check_read()? {
            return Ok(Model::mem(self.graph_iri()));
        }
        Ok(self.readable_model()?.intersection(other)?)
    }

    /// Readable statements of self absent from `other`
    pub fn difference(&self, other: &Model) -> Result<Model> {
        if !self.checker().check_read()? {
            return Ok(Model::mem(self.graph_iri()));
        }
        Ok(self.readable_model()?.difference(other)?)
    }

    /// Readable statements satisfying `selector`, as a new model
    pub fn query(&self, selector: &Selector) -> Result<Model> {
        if !self.checker().check_read()? {
            return Ok(Model::mem(self.graph_iri()));
        }
        let out = Model::mem(format!("{}#query", self.graph_iri()));
        for t in self.graph.find(&selector.to_pattern())? {
            if selector.matches(&t) {
                out.add(&Statement::from_triple(t)?)?;
            }
        }
        Ok(out)
    }

    fn readable_model(&self) -> Result<Model> {
        let projection = self.graph.readable_projection()?;
        projection
            .prefix_mapping()
            .set_all(self.base.prefix_mapping());
        Ok(Model::new(Arc::new(projection)))
    }

    // ------------------------------------------------------------------
    // property access
    // ------------------------------------------------------------------

    /// The first readable statement `(s, p, _)`
    pub fn get_property(&self, s: &Node, p: &Node) -> Result<Option<Statement>> {
        self.first_property(s, p, None)
    }

    /// The first readable statement `(s, p, literal)` whose language matches
    ///
    /// The empty string matches only untagged literals.
    pub fn get_property_lang(&self, s: &Node, p: &Node, lang: &str) -> Result<Option<Statement>> {
        self.first_property(s, p, Some(lang))
    }

    fn first_property(&self, s: &Node, p: &Node, lang: Option<&str>) -> Result<Option<Statement>> {
        if !self.checker().check_read()? {
            return Ok(None);
        }
        let pattern = Triple::new(s.clone(), p.clone(), Node::Any);
        for t in self.graph.find(&pattern)? {
            if let Some(lang) = lang {
                let matched = t.o.as_literal().is_some_and(|lit| lit.matches_lang(lang));
                if !matched {
                    continue;
                }
            }
            return Ok(Some(Statement::from_triple(t)?));
        }
        Ok(None)
    }

    /// As [`get_property`](Self::get_property), raising when nothing matches
    ///
    /// When nothing matches and the principal may not read `(s, p, ANY)`,
    /// the error is `ReadDenied`: absence itself would reveal information.
    pub fn get_required_property(&self, s: &Node, p: &Node) -> Result<Statement> {
        self.required_property(s, p, None)
    }

    /// Language-filtered required property lookup
    pub fn get_required_property_lang(&self, s: &Node, p: &Node, lang: &str) -> Result<Statement> {
        self.required_property(s, p, Some(lang))
    }

    fn required_property(&self, s: &Node, p: &Node, lang: Option<&str>) -> Result<Statement> {
        if let Some(stmt) = self.first_property(s, p, lang)? {
            return Ok(stmt);
        }
        let pattern = Triple::new(s.clone(), p.clone(), Node::Any);
        if self.checker().can_read_triple(&pattern)? {
            Err(AccessError::property_not_found(s.clone(), p.clone()))
        } else {
            Err(AccessError::read_denied_triple(
                self.graph_iri(),
                pattern,
            ))
        }
    }

    // ------------------------------------------------------------------
    // creation helpers
    // ------------------------------------------------------------------

    /// A fresh anonymous resource: Update, plus Create of a future triple
    pub fn create_resource(&self) -> Result<Node> {
        self.checker().check_update()?;
        self.checker().check_create(&Triple::new(
            future_node(),
            ignore_node(),
            ignore_node(),
        ))?;
        Ok(Node::new_blank())
    }

    /// Build `(s, p, value)` with the canonical literal, without adding it
    pub fn create_literal_statement(
        &self,
        s: &Node,
        p: &Node,
        value: impl Into<Literal>,
    ) -> Result<Statement> {
        self.checker().check_update()?;
        let stmt = Statement::new(s.clone(), p.clone(), Node::literal(value))?;
        self.checker().check_create(stmt.as_triple())?;
        Ok(stmt)
    }

    /// Add `(s, p, value)` with the canonical literal form
    pub fn add_literal(&self, s: &Node, p: &Node, value: impl Into<Literal>) -> Result<()> {
        let stmt = self.create_literal_statement(s, p, value)?;
        self.base.add(&stmt)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // reification
    // ------------------------------------------------------------------

    /// Reify `stmt`: Update, plus Create of each constituent triple
    ///
    /// With no `uri` the reification root is a fresh blank node; Create
    /// checks then run against the future marker, since the root's identity
    /// is irrelevant before it exists.
    pub fn create_reified_statement(&self, uri: Option<&str>, stmt: &Statement) -> Result<Node> {
        self.checker().check_update()?;
        let check_root = match uri {
            Some(u) => Node::iri(u),
            None => future_node(),
        };
        for t in reification_quad(&check_root, stmt) {
            self.checker().check_create(&t)?;
        }
        Ok(self.base.reify(uri, stmt)?)
    }

    /// The first readable reification of `stmt`, creating one if none exists
    ///
    /// Read suffices when a readable reification exists; otherwise the
    /// Update and Create checks of [`create_reified_statement`](Self::create_reified_statement) apply.
    pub fn get_any_reified_statement(&self, stmt: &Statement) -> Result<Node> {
        if let Some(r) = self.readable_reifications(stmt)?.into_iter().next() {
            return Ok(r);
        }
        self.create_reified_statement(None, stmt)
    }

    /// True when at least one reification of `stmt` is fully readable
    pub fn is_reified(&self, stmt: &Statement) -> Result<bool> {
        Ok(!self.readable_reifications(stmt)?.is_empty())
    }

    /// Every fully readable reification root of `stmt`
    pub fn list_reified_statements_of(&self, stmt: &Statement) -> Result<Vec<Node>> {
        self.readable_reifications(stmt)
    }

    /// Every fully readable (root, statement) reification pair
    pub fn list_reified_statements(&self) -> Result<Vec<(Node, Statement)>> {
        if !self.checker().check_read()? {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for (r, stmt) in self.base.reified_statements()? {
            if self.quad_readable(&r, &stmt)? {
                out.push((r, stmt));
            }
        }
        Ok(out)
    }

    fn readable_reifications(&self, stmt: &Statement) -> Result<Vec<Node>> {
        if !self.checker().check_read()? {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for r in self.base.reifications_of(stmt)? {
            if self.quad_readable(&r, stmt)? {
                out.push(r);
            }
        }
        Ok(out)
    }

    // a reification is observable only when all four constituent triples are
    fn quad_readable(&self, r: &Node, stmt: &Statement) -> Result<bool> {
        if self.checker().can_read_any()? {
            return Ok(true);
        }
        for t in reification_quad(r, stmt) {
            if !self.checker().can_read_triple(&t)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Remove the reification rooted at `r`: Update, plus Delete per triple
    pub fn remove_reification(&self, r: &Node) -> Result<()> {
        self.checker().check_update()?;
        let triples = self.base.reification_triples_of(r)?;
        for t in &triples {
            self.checker().check_delete(t)?;
        }
        for t in &triples {
            self.base.graph().delete(t)?;
        }
        Ok(())
    }

    /// Remove every reification of `stmt`, fail-closed across the whole set
    pub fn remove_all_reifications(&self, stmt: &Statement) -> Result<()> {
        self.checker().check_update()?;
        let mut doomed = Vec::new();
        for r in self.base.reifications_of(stmt)? {
            for t in self.base.reification_triples_of(&r)? {
                self.checker().check_delete(&t)?;
                doomed.push(t);
            }
        }
        for t in &doomed {
            self.base.graph().delete(t)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // lists and containers
    // ------------------------------------------------------------------

    /// Build an RDF list: Update, plus the per-member Create decomposition
    ///
    /// The checks run against the wildcard forms of the cell triples, since
    /// cell identities do not exist until the list materializes.
    pub fn create_list(&self, members: &[Node]) -> Result<Node> {
        self.checker().check_update()?;
        self.checker().check_create(&Triple::new(
            Node::iri(rdf::NIL),
            ignore_node(),
            ignore_node(),
        ))?;
        for member in members {
            self.checker().check_create(&Triple::new(
                Node::Any,
                Node::iri(rdf::FIRST),
                member.clone(),
            ))?;
            self.checker().check_create(&Triple::new(
                Node::Any,
                Node::iri(rdf::REST),
                Node::Any,
            ))?;
        }
        Ok(self.base.create_list(members)?)
    }

    /// Readable members of the RDF list rooted at `head`
    pub fn list_members(&self, head: &Node) -> Result<Vec<Node>> {
        if !self.checker().check_read()? {
            return Ok(Vec::new());
        }
        if self.checker().can_read_any()? {
            return Ok(self.base.list_members(head)?);
        }
        // walk on the readable projection so hidden cells stay hidden
        let projection = Model::new(Arc::new(self.graph.readable_projection()?));
        Ok(projection.list_members(head)?)
    }

    // ------------------------------------------------------------------
    // serialization
    // ------------------------------------------------------------------

    /// Bulk-add an N-Triples document: Update, plus Create per statement
    ///
    /// Pre-checks the parsed batch, so a denial adds nothing.
    pub fn read_ntriples(&self, input: &str) -> Result<usize> {
        self.checker().check_update()?;
        let triples = warden_graph::ntriples::parse_document(input)?;
        for t in &triples {
            self.checker().check_create(t)?;
        }
        let n = triples.len();
        for t in triples {
            self.base.graph().add(t)?;
        }
        Ok(n)
    }

    /// Serialize the readable projection as N-Triples
    ///
    /// With blanket read permission this delegates to the base writer;
    /// otherwise a readable-only temporary model is serialized. A soft-mode
    /// graph read denial yields the empty document.
    pub fn write_ntriples(&self) -> Result<String> {
        if !self.checker().check_read()? {
            return Ok(String::new());
        }
        if self.checker().can_read_any()? {
            return Ok(self.base.write_ntriples()?);
        }
        Ok(self.readable_model()?.write_ntriples()?)
    }

    // ------------------------------------------------------------------
    // passthrough
    // ------------------------------------------------------------------

    /// The secured prefix-mapping façade
    pub fn prefix_mapping(&self) -> &SecuredPrefixMapping {
        self.graph.prefix_mapping()
    }

    /// The secured event manager
    pub fn event_manager(&self) -> &crate::event::SecuredEventManager {
        self.graph.event_manager()
    }

    /// Signal an application-defined event to listeners
    pub fn notify_event(&self, event: &str) {
        self.event_manager().notify_event(event)
    }

    /// Size of the readable projection
    pub fn size(&self) -> Result<usize> {
        self.graph.size()
    }

    /// True when the readable projection is empty
    pub fn is_empty(&self) -> Result<bool> {
        self.graph.is_empty()
    }

    /// Isomorphism restricted to the readable projection
    pub fn is_isomorphic_with(&self, other: &Model) -> Result<bool> {
        self.graph.is_isomorphic_with(other.graph().as_ref())
    }

    /// Close the base; requires no authorization
    pub fn close(&self) {
        self.graph.close()
    }

    /// True once the base is closed
    pub fn is_closed(&self) -> bool {
        self.graph.is_closed()
    }

    pub(crate) fn base(&self) -> &Model {
        &self.base
    }
}

impl std::fmt::Debug for SecuredModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredModel")
            .field("graph", &self.graph_iri())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{Action, Principal, StaticEvaluator};
    use warden_graph::MemGraph;

    fn iri(s: &str) -> Node {
        Node::iri(format!("http://e/{s}"))
    }

    fn stmt(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(iri(s), iri(p), iri(o)).unwrap()
    }

    fn open_model() -> SecuredModel {
        SecuredModel::new(
            Arc::new(StaticEvaluator::allow_all(Principal::named("alice"))),
            Arc::new(MemGraph::new("http://e/g")),
        )
    }

    // consistent with hidden content: wildcard-object Reads are denied while
    // any secret triple could match them
    fn secret_rule(_: &Principal, action: Action, triple: &Triple) -> bool {
        if triple.o == Node::iri("http://e/secret") || triple.o == Node::literal("secret") {
            return false;
        }
        match action {
            Action::Read => triple.o != Node::Any,
            _ => true,
        }
    }

    fn filtered_model() -> SecuredModel {
        SecuredModel::new(
            Arc::new(
                StaticEvaluator::allow_all(Principal::named("alice"))
                    .with_triple_rule(secret_rule),
            ),
            Arc::new(MemGraph::new("http://e/g")),
        )
    }

    #[test]
    fn test_round_trip_add_contains_remove() {
        let m = open_model();
        let s = stmt("s", "p", "o");
        m.add(&s).unwrap();
        assert!(m.contains(&s).unwrap());
        m.remove(&s).unwrap();
        assert!(!m.contains(&s).unwrap());
    }

    #[test]
    fn test_bulk_add_is_fail_closed() {
        let m = filtered_model();
        let batch = vec![stmt("s", "p", "a"), stmt("s", "p", "secret"), stmt("s", "p", "b")];
        let err = m.add_all(&batch).unwrap_err();
        match err {
            AccessError::AddDenied { triple, .. } => {
                assert_eq!(triple, stmt("s", "p", "secret").into_triple())
            }
            other => panic!("expected AddDenied, got {other:?}"),
        }
        assert_eq!(m.base().size().unwrap(), 0);
    }

    #[test]
    fn test_contains_all_needs_readability() {
        let m = filtered_model();
        m.base().add(&stmt("s", "p", "a")).unwrap();
        m.base().add(&stmt("s", "p", "secret")).unwrap();

        let probe = Model::mem("http://e/probe");
        probe.add(&stmt("s", "p", "a")).unwrap();
        assert!(m.contains_all(&probe).unwrap());

        probe.add(&stmt("s", "p", "secret")).unwrap();
        assert!(!m.contains_all(&probe).unwrap());
        assert!(m.contains_any(&probe).unwrap());

        let hidden_only = Model::mem("http://e/hidden");
        hidden_only.add(&stmt("s", "p", "secret")).unwrap();
        assert!(!m.contains_any(&hidden_only).unwrap());
    }

    #[test]
    fn test_set_ops_use_readable_projection() {
        let m = filtered_model();
        m.base().add(&stmt("s", "p", "a")).unwrap();
        m.base().add(&stmt("s", "p", "secret")).unwrap();

        let other = Model::mem("http://e/other");
        other.add(&stmt("s", "p", "b")).unwrap();

        let union = m.union(&other).unwrap();
        assert_eq!(union.size().unwrap(), 2);
        assert!(!union.contains(&stmt("s", "p", "secret")).unwrap());

        let diff = m.difference(&other).unwrap();
        assert_eq!(diff.size().unwrap(), 1);
        assert!(diff.contains(&stmt("s", "p", "a")).unwrap());
    }

    #[test]
    fn test_get_property_skips_unreadable() {
        let m = filtered_model();
        m.base().add(&stmt("s", "p", "secret")).unwrap();
        assert_eq!(m.get_property(&iri("s"), &iri("p")).unwrap(), None);

        m.base().add(&stmt("s", "p", "a")).unwrap();
        let found = m.get_property(&iri("s"), &iri("p")).unwrap().unwrap();
        assert_eq!(found, stmt("s", "p", "a"));
    }

    #[test]
    fn test_get_property_lang() {
        let m = open_model();
        m.add_literal(&iri("s"), &iri("p"), Literal::lang_string("chat", "fr"))
            .unwrap();
        m.add_literal(&iri("s"), &iri("p"), "plain").unwrap();

        let fr = m
            .get_property_lang(&iri("s"), &iri("p"), "fr")
            .unwrap()
            .unwrap();
        assert_eq!(
            fr.object().as_literal().unwrap().language(),
            Some("fr")
        );
        let untagged = m
            .get_property_lang(&iri("s"), &iri("p"), "")
            .unwrap()
            .unwrap();
        assert_eq!(untagged.object().as_literal().unwrap().lexical, "plain");
    }

    #[test]
    fn test_required_property_absent_and_unreadable_is_read_denied() {
        let m = SecuredModel::new(
            Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
                |_, _, triple| triple.p != Node::iri("http://e/hidden"),
            )),
            Arc::new(MemGraph::new("http://e/g")),
        );
        // absent + readable pattern: plain not-found
        assert!(matches!(
            m.get_required_property(&iri("s"), &iri("p")),
            Err(AccessError::PropertyNotFound { .. })
        ));
        // absent + unreadable pattern: denial, not absence
        assert!(matches!(
            m.get_required_property(&iri("s"), &iri("hidden")),
            Err(AccessError::ReadDenied { .. })
        ));
    }

    #[test]
    fn test_reification_visibility_requires_full_quad() {
        let m = SecuredModel::new(
            Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
                |_, _, triple| triple.is_concrete() && triple.p != Node::iri(rdf::OBJECT),
            )),
            Arc::new(MemGraph::new("http://e/g")),
        );
        let s = stmt("s", "p", "o");
        m.base().reify(Some("http://e/r1"), &s).unwrap();
        assert!(!m.is_reified(&s).unwrap());
        assert!(m.list_reified_statements().unwrap().is_empty());
    }

    #[test]
    fn test_reification_lifecycle_checked() {
        let m = open_model();
        let s = stmt("s", "p", "o");
        let r = m.create_reified_statement(Some("http://e/r1"), &s).unwrap();
        assert!(m.is_reified(&s).unwrap());
        assert_eq!(m.get_any_reified_statement(&s).unwrap(), r);

        m.remove_all_reifications(&s).unwrap();
        assert!(!m.is_reified(&s).unwrap());
        assert!(m.base().is_empty().unwrap());
    }

    #[test]
    fn test_get_any_reified_statement_creates_when_missing() {
        let m = open_model();
        let s = stmt("s", "p", "o");
        m.add(&s).unwrap();
        let r = m.get_any_reified_statement(&s).unwrap();
        assert!(r.is_blank());
        assert!(m.is_reified(&s).unwrap());
    }

    #[test]
    fn test_create_list_checks_members() {
        let m = filtered_model();
        let err = m
            .create_list(&[iri("a"), iri("secret")])
            .unwrap_err();
        assert!(matches!(err, AccessError::AddDenied { .. }));
        assert_eq!(m.base().size().unwrap(), 0);

        let head = m.create_list(&[iri("a"), iri("b")]).unwrap();
        assert_eq!(m.list_members(&head).unwrap(), vec![iri("a"), iri("b")]);
    }

    #[test]
    fn test_write_excludes_unreadable() {
        let m = filtered_model();
        m.base().add(&stmt("s", "p", "a")).unwrap();
        m.base().add(&stmt("s", "p", "secret")).unwrap();
        let doc = m.write_ntriples().unwrap();
        assert!(doc.contains("http://e/a"));
        assert!(!doc.contains("secret"));
    }

    #[test]
    fn test_read_is_bulk_add_with_checks() {
        let m = filtered_model();
        let doc = "<http://e/s> <http://e/p> <http://e/a> .\n<http://e/s> <http://e/p> <http://e/secret> .\n";
        assert!(matches!(
            m.read_ntriples(doc),
            Err(AccessError::AddDenied { .. })
        ));
        assert_eq!(m.base().size().unwrap(), 0);

        let ok_doc = "<http://e/s> <http://e/p> <http://e/a> .\n";
        assert_eq!(m.read_ntriples(ok_doc).unwrap(), 1);
        assert_eq!(m.size().unwrap(), 1);
    }

    #[test]
    fn test_projection_listings_deduplicate() {
        let m = filtered_model();
        m.base().add(&stmt("s", "p", "a")).unwrap();
        m.base().add(&stmt("s", "q", "b")).unwrap();
        m.base().add(&stmt("s", "p", "secret")).unwrap();
        m.base().add(&stmt("z", "p", "secret")).unwrap();

        assert_eq!(m.list_subjects().unwrap(), vec![iri("s")]);
        let objs = m.list_objects_of_property(&iri("p")).unwrap();
        assert_eq!(objs, vec![iri("a")]);
        assert_eq!(
            m.list_subjects_with_property_value(&iri("q"), &iri("b")).unwrap(),
            vec![iri("s")]
        );
    }

    #[test]
    fn test_create_resource_checks_future_triple() {
        let m = SecuredModel::new(
            Arc::new(StaticEvaluator::new(
                Principal::named("alice"),
                [Action::Read, Action::Update],
            )),
            Arc::new(MemGraph::new("http://e/g")),
        );
        assert!(matches!(
            m.create_resource(),
            Err(AccessError::AddDenied { .. })
        ));

        let open = open_model();
        assert!(open.create_resource().unwrap().is_blank());
    }
}
