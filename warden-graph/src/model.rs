//! Statement-level model layer
//!
//! A [`Model`] reinterprets a [`Graph`] with typed roles: statements have a
//! resource subject, an IRI predicate, and a concrete object. The model layer
//! adds the statement-oriented operations a graph does not have: bulk
//! add/remove, set operations, property lookup, literal helpers, reification,
//! RDF lists, containers, and N-Triples read/write.
//!
//! The model owns nothing: it shares its graph through `Arc<dyn Graph>` and
//! every operation delegates to it.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::mem::MemGraph;
use crate::node::{Literal, Node};
use crate::ntriples;
use crate::prefix::PrefixMapping;
use crate::triple::Triple;
use std::collections::HashSet;
use std::sync::Arc;
use warden_vocab::rdf;

/// A triple with typed roles: resource subject, IRI predicate, concrete object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Statement {
    inner: Triple,
}

impl Statement {
    /// Create a statement, validating role constraints
    pub fn new(s: Node, p: Node, o: Node) -> Result<Self> {
        Self::from_triple(Triple::new(s, p, o))
    }

    /// Reinterpret a concrete triple as a statement
    pub fn from_triple(triple: Triple) -> Result<Self> {
        if !triple.is_concrete() {
            return Err(GraphError::term(format!(
                "statement must be concrete: {triple}"
            )));
        }
        if !triple.s.is_resource() {
            return Err(GraphError::term(format!(
                "statement subject must be a resource: {}",
                triple.s
            )));
        }
        if triple.p.as_iri().is_none() {
            return Err(GraphError::term(format!(
                "statement predicate must be an IRI: {}",
                triple.p
            )));
        }
        Ok(Self { inner: triple })
    }

    /// Subject resource
    pub fn subject(&self) -> &Node {
        &self.inner.s
    }

    /// Predicate property
    pub fn predicate(&self) -> &Node {
        &self.inner.p
    }

    /// Object node
    pub fn object(&self) -> &Node {
        &self.inner.o
    }

    /// The statement as its underlying triple
    pub fn as_triple(&self) -> &Triple {
        &self.inner
    }

    /// Consume into the underlying triple
    pub fn into_triple(self) -> Triple {
        self.inner
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// A statement filter for [`Model::query`]
///
/// `None` components match anything; `lang` restricts literal objects by
/// language tag, where the empty string matches only untagged literals.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    /// Required subject, or any
    pub subject: Option<Node>,
    /// Required predicate, or any
    pub predicate: Option<Node>,
    /// Required object, or any
    pub object: Option<Node>,
    /// Required language tag on literal objects
    pub lang: Option<String>,
}

impl Selector {
    /// The find pattern corresponding to this selector
    pub fn to_pattern(&self) -> Triple {
        Triple::new(
            self.subject.clone().unwrap_or(Node::Any),
            self.predicate.clone().unwrap_or(Node::Any),
            self.object.clone().unwrap_or(Node::Any),
        )
    }

    /// True when `triple` satisfies every constraint
    pub fn matches(&self, triple: &Triple) -> bool {
        if !self.to_pattern().matches(triple) {
            return false;
        }
        match &self.lang {
            None => true,
            Some(lang) => triple
                .o
                .as_literal()
                .is_some_and(|lit| lit.matches_lang(lang)),
        }
    }
}

/// The four constituent triples of a reification of `stmt` under resource `r`.
pub fn reification_quad(r: &Node, stmt: &Statement) -> [Triple; 4] {
    [
        Triple::new(r.clone(), Node::iri(rdf::TYPE), Node::iri(rdf::STATEMENT)),
        Triple::new(r.clone(), Node::iri(rdf::SUBJECT), stmt.subject().clone()),
        Triple::new(r.clone(), Node::iri(rdf::PREDICATE), stmt.predicate().clone()),
        Triple::new(r.clone(), Node::iri(rdf::OBJECT), stmt.object().clone()),
    ]
}

/// Container flavor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Unordered container
    Bag,
    /// Set of alternatives
    Alt,
    /// Ordered container
    Seq,
}

impl ContainerKind {
    /// The rdf:type IRI for this container kind
    pub fn type_iri(&self) -> &'static str {
        match self {
            ContainerKind::Bag => rdf::BAG,
            ContainerKind::Alt => rdf::ALT,
            ContainerKind::Seq => rdf::SEQ,
        }
    }
}

/// Statement-level façade over a shared graph.
#[derive(Clone)]
pub struct Model {
    graph: Arc<dyn Graph>,
}

impl Model {
    /// Create a model over an existing graph
    pub fn new(graph: Arc<dyn Graph>) -> Self {
        Self { graph }
    }

    /// Create a model over a fresh in-memory graph
    pub fn mem(iri: impl Into<String>) -> Self {
        Self::new(Arc::new(MemGraph::new(iri)))
    }

    /// The underlying graph
    pub fn graph(&self) -> &Arc<dyn Graph> {
        &self.graph
    }

    /// The graph IRI
    pub fn graph_iri(&self) -> &str {
        self.graph.graph_iri()
    }

    /// The graph's prefix mapping
    pub fn prefix_mapping(&self) -> &PrefixMapping {
        self.graph.prefix_mapping()
    }

    // ------------------------------------------------------------------
    // add / remove
    // ------------------------------------------------------------------

    /// Add one statement
    pub fn add(&self, stmt: &Statement) -> Result<()> {
        self.graph.add(stmt.as_triple().clone())
    }

    /// Add every statement in the slice
    pub fn add_all(&self, stmts: &[Statement]) -> Result<()> {
        for s in stmts {
            self.add(s)?;
        }
        Ok(())
    }

    /// Add every statement of another model
    pub fn add_model(&self, other: &Model) -> Result<()> {
        for s in other.statements()? {
            self.add(&s)?;
        }
        Ok(())
    }

    /// Remove one statement
    pub fn remove(&self, stmt: &Statement) -> Result<()> {
        self.graph.delete(stmt.as_triple())
    }

    /// Remove every statement in the slice
    pub fn remove_all(&self, stmts: &[Statement]) -> Result<()> {
        for s in stmts {
            self.remove(s)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // listing and containment
    // ------------------------------------------------------------------

    /// Every statement in the model
    pub fn statements(&self) -> Result<Vec<Statement>> {
        self.statements_matching(&Triple::any())
    }

    /// Statements matching a pattern
    pub fn statements_matching(&self, pattern: &Triple) -> Result<Vec<Statement>> {
        self.graph
            .find(pattern)?
            .map(Statement::from_triple)
            .collect()
    }

    /// True when the statement is present
    pub fn contains(&self, stmt: &Statement) -> Result<bool> {
        self.graph.contains(stmt.as_triple())
    }

    /// True when every statement of `other` is present
    pub fn contains_all(&self, other: &Model) -> Result<bool> {
        for s in other.statements()? {
            if !self.contains(&s)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when at least one statement of `other` is present
    pub fn contains_any(&self, other: &Model) -> Result<bool> {
        for s in other.statements()? {
            if self.contains(&s)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when some triple mentions `node` in any position
    pub fn contains_resource(&self, node: &Node) -> Result<bool> {
        for pattern in mention_patterns(node) {
            if self.graph.contains(&pattern)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Distinct subjects
    pub fn subjects(&self) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for t in self.graph.find(&Triple::any())? {
            if seen.insert(t.s.clone()) {
                out.push(t.s);
            }
        }
        Ok(out)
    }

    /// Distinct objects
    pub fn objects(&self) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for t in self.graph.find(&Triple::any())? {
            if seen.insert(t.o.clone()) {
                out.push(t.o);
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // property access
    // ------------------------------------------------------------------

    /// The first statement (s, p, _), if any
    pub fn get_property(&self, s: &Node, p: &Node) -> Result<Option<Statement>> {
        let pattern = Triple::new(s.clone(), p.clone(), Node::Any);
        match self.graph.find(&pattern)?.next() {
            Some(t) => Ok(Some(Statement::from_triple(t)?)),
            None => Ok(None),
        }
    }

    /// Add `(s, p, value)` with the value's canonical literal form
    pub fn add_literal(&self, s: &Node, p: &Node, value: impl Into<Literal>) -> Result<()> {
        let stmt = Statement::new(s.clone(), p.clone(), Node::literal(value))?;
        self.add(&stmt)
    }

    /// True when `(s, p, value)` is present with the canonical literal form
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
    // set operations
    // ------------------------------------------------------------------

    /// A new in-memory model holding the statements of both models
    pub fn union(&self, other: &Model) -> Result<Model> {
        let out = self.fresh("union");
        out.add_model(self)?;
        out.add_model(other)?;
        Ok(out)
    }

    /// A new in-memory model holding the statements present in both models
    pub fn intersection(&self, other: &Model) -> Result<Model> {
        let out = self.fresh("intersection");
        for s in self.statements()? {
            if other.contains(&s)? {
                out.add(&s)?;
            }
        }
        Ok(out)
    }

    /// A new in-memory model holding this model's statements absent from `other`
    pub fn difference(&self, other: &Model) -> Result<Model> {
        let out = self.fresh("difference");
        for s in self.statements()? {
            if !other.contains(&s)? {
                out.add(&s)?;
            }
        }
        Ok(out)
    }

    /// Statements satisfying `selector`, as a new in-memory model
    pub fn query(&self, selector: &Selector) -> Result<Model> {
        let out = self.fresh("query");
        for t in self.graph.find(&selector.to_pattern())? {
            if selector.matches(&t) {
                out.add(&Statement::from_triple(t)?)?;
            }
        }
        Ok(out)
    }

    fn fresh(&self, tag: &str) -> Model {
        let m = Model::mem(format!("{}#{tag}", self.graph_iri()));
        m.prefix_mapping().set_all(self.prefix_mapping());
        m
    }

    // ------------------------------------------------------------------
    // reification
    // ------------------------------------------------------------------

    /// Reify `stmt` under `uri`, or under a fresh blank node
    ///
    /// Writes the four constituent triples and returns the reification
    /// resource.
    pub fn reify(&self, uri: Option<&str>, stmt: &Statement) -> Result<Node> {
        let r = match uri {
            Some(u) => Node::iri(u),
            None => Node::new_blank(),
        };
        for t in reification_quad(&r, stmt) {
            self.graph.add(t)?;
        }
        Ok(r)
    }

    /// Every resource that reifies `stmt` with a complete quad
    pub fn reifications_of(&self, stmt: &Statement) -> Result<Vec<Node>> {
        let candidates = self.graph.find(&Triple::new(
            Node::Any,
            Node::iri(rdf::SUBJECT),
            stmt.subject().clone(),
        ))?;
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for c in candidates {
            let r = c.s;
            if !seen.insert(r.clone()) {
                continue;
            }
            if self.quad_complete(&r, stmt)? {
                out.push(r);
            }
        }
        Ok(out)
    }

    fn quad_complete(&self, r: &Node, stmt: &Statement) -> Result<bool> {
        for t in reification_quad(r, stmt) {
            if !self.graph.contains(&t)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when at least one complete reification of `stmt` exists
    pub fn is_reified(&self, stmt: &Statement) -> Result<bool> {
        Ok(!self.reifications_of(stmt)?.is_empty())
    }

    /// Remove the reification quad rooted at `r`
    pub fn remove_reification(&self, r: &Node) -> Result<()> {
        for t in self.reification_triples_of(r)? {
            self.graph.delete(&t)?;
        }
        Ok(())
    }

    /// The reification triples currently rooted at `r`
    pub fn reification_triples_of(&self, r: &Node) -> Result<Vec<Triple>> {
        let mut out = Vec::new();
        for p in [rdf::TYPE, rdf::SUBJECT, rdf::PREDICATE, rdf::OBJECT] {
            for t in self
                .graph
                .find(&Triple::new(r.clone(), Node::iri(p), Node::Any))?
            {
                // only the reification type triple participates
                if p == rdf::TYPE && t.o != Node::iri(rdf::STATEMENT) {
                    continue;
                }
                out.push(t);
            }
        }
        Ok(out)
    }

    /// Remove every reification of `stmt`
    pub fn remove_all_reifications(&self, stmt: &Statement) -> Result<()> {
        for r in self.reifications_of(stmt)? {
            self.remove_reification(&r)?;
        }
        Ok(())
    }

    /// Every (resource, statement) pair with a complete reification quad
    pub fn reified_statements(&self) -> Result<Vec<(Node, Statement)>> {
        let roots = self.graph.find(&Triple::new(
            Node::Any,
            Node::iri(rdf::TYPE),
            Node::iri(rdf::STATEMENT),
        ))?;
        let mut out = Vec::new();
        for root in roots {
            let r = root.s;
            let Some(stmt) = self.reified_statement_of(&r)? else {
                continue;
            };
            out.push((r, stmt));
        }
        Ok(out)
    }

    /// The statement reified by `r`, when its quad is complete
    pub fn reified_statement_of(&self, r: &Node) -> Result<Option<Statement>> {
        let one = |p: &str| -> Result<Option<Node>> {
            Ok(self
                .graph
                .find(&Triple::new(r.clone(), Node::iri(p), Node::Any))?
                .next()
                .map(|t| t.o))
        };
        let (Some(s), Some(p), Some(o)) = (
            one(rdf::SUBJECT)?,
            one(rdf::PREDICATE)?,
            one(rdf::OBJECT)?,
        ) else {
            return Ok(None);
        };
        let type_triple = Triple::new(r.clone(), Node::iri(rdf::TYPE), Node::iri(rdf::STATEMENT));
        if !self.graph.contains(&type_triple)? {
            return Ok(None);
        }
        Ok(Some(Statement::new(s, p, o)?))
    }

    // ------------------------------------------------------------------
    // RDF lists
    // ------------------------------------------------------------------

    /// Build an RDF list of `members`, returning its head
    ///
    /// The empty list is `rdf:nil`.
    pub fn create_list(&self, members: &[Node]) -> Result<Node> {
        let mut head = Node::iri(rdf::NIL);
        for member in members.iter().rev() {
            let cell = Node::new_blank();
            self.graph.add(Triple::new(
                cell.clone(),
                Node::iri(rdf::FIRST),
                member.clone(),
            ))?;
            self.graph
                .add(Triple::new(cell.clone(), Node::iri(rdf::REST), head))?;
            head = cell;
        }
        Ok(head)
    }

    /// The members of the RDF list rooted at `head`, in order
    pub fn list_members(&self, head: &Node) -> Result<Vec<Node>> {
        let mut out = Vec::new();
        let mut cursor = head.clone();
        let mut visited = HashSet::new();
        while cursor != Node::iri(rdf::NIL) {
            if !visited.insert(cursor.clone()) {
                return Err(GraphError::term("cyclic RDF list"));
            }
            let first = self
                .graph
                .find(&Triple::new(cursor.clone(), Node::iri(rdf::FIRST), Node::Any))?
                .next()
                .ok_or_else(|| GraphError::term("malformed RDF list: missing rdf:first"))?;
            out.push(first.o);
            let rest = self
                .graph
                .find(&Triple::new(cursor.clone(), Node::iri(rdf::REST), Node::Any))?
                .next()
                .ok_or_else(|| GraphError::term("malformed RDF list: missing rdf:rest"))?;
            cursor = rest.o;
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // containers
    // ------------------------------------------------------------------

    /// Create a Bag/Alt/Seq container, optionally IRI-named
    pub fn create_container(&self, kind: ContainerKind, uri: Option<&str>) -> Result<Node> {
        let c = match uri {
            Some(u) => Node::iri(u),
            None => Node::new_blank(),
        };
        self.graph.add(Triple::new(
            c.clone(),
            Node::iri(rdf::TYPE),
            Node::iri(kind.type_iri()),
        ))?;
        Ok(c)
    }

    /// Membership entries of a container, sorted by index
    pub fn container_members(&self, container: &Node) -> Result<Vec<(u32, Node)>> {
        let mut out = Vec::new();
        for t in self
            .graph
            .find(&Triple::new(container.clone(), Node::Any, Node::Any))?
        {
            let Some(p) = t.p.as_iri() else { continue };
            if let Some(i) = rdf::member_index(p) {
                out.push((i, t.o));
            }
        }
        out.sort_by_key(|(i, _)| *i);
        Ok(out)
    }

    /// Number of membership triples in a container
    pub fn container_size(&self, container: &Node) -> Result<usize> {
        Ok(self.container_members(container)?.len())
    }

    /// Append `value` at the next free index, returning that index
    pub fn container_add(&self, container: &Node, value: &Node) -> Result<u32> {
        let next = self
            .container_members(container)?
            .last()
            .map(|(i, _)| i + 1)
            .unwrap_or(1);
        self.graph.add(Triple::new(
            container.clone(),
            Node::iri(rdf::member(next)),
            value.clone(),
        ))?;
        Ok(next)
    }

    /// True when some membership triple of the container holds `value`
    pub fn container_contains(&self, container: &Node, value: &Node) -> Result<bool> {
        Ok(self
            .container_members(container)?
            .iter()
            .any(|(_, v)| v == value))
    }

    /// Remove the membership triple at `index` holding `value`
    pub fn container_remove(&self, container: &Node, index: u32, value: &Node) -> Result<()> {
        self.graph.delete(&Triple::new(
            container.clone(),
            Node::iri(rdf::member(index)),
            value.clone(),
        ))
    }

    /// The value at `index` in a Seq
    pub fn seq_get(&self, seq: &Node, index: u32) -> Result<Option<Node>> {
        Ok(self
            .graph
            .find(&Triple::new(
                seq.clone(),
                Node::iri(rdf::member(index)),
                Node::Any,
            ))?
            .next()
            .map(|t| t.o))
    }

    // ------------------------------------------------------------------
    // serialization
    // ------------------------------------------------------------------

    /// Add every triple of an N-Triples document, returning the count added
    pub fn read_ntriples(&self, input: &str) -> Result<usize> {
        let triples = ntriples::parse_document(input)?;
        let n = triples.len();
        for t in triples {
            self.graph.add(t)?;
        }
        Ok(n)
    }

    /// Serialize the model as a deterministic (line-sorted) N-Triples document
    pub fn write_ntriples(&self) -> Result<String> {
        let mut lines: Vec<String> = self
            .graph
            .find(&Triple::any())?
            .map(|t| {
                let mut line = String::new();
                ntriples::write_triple(&mut line, &t);
                line
            })
            .collect();
        lines.sort();
        Ok(lines.concat())
    }

    // ------------------------------------------------------------------
    // graph passthrough
    // ------------------------------------------------------------------

    /// Number of statements
    pub fn size(&self) -> Result<usize> {
        self.graph.size()
    }

    /// True when the model holds no statements
    pub fn is_empty(&self) -> Result<bool> {
        self.graph.is_empty()
    }

    /// Blank-node-aware isomorphism with another model
    pub fn is_isomorphic_with(&self, other: &Model) -> Result<bool> {
        self.graph.is_isomorphic_with(other.graph.as_ref())
    }

    /// Close the underlying graph
    pub fn close(&self) {
        self.graph.close()
    }

    /// True once the underlying graph is closed
    pub fn is_closed(&self) -> bool {
        self.graph.is_closed()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("graph", &self.graph.graph_iri())
            .finish()
    }
}

/// Patterns that mention `node` in each position it can legally occupy
pub fn mention_patterns(node: &Node) -> Vec<Triple> {
    let mut patterns = Vec::new();
    if node.is_resource() {
        patterns.push(Triple::new(node.clone(), Node::Any, Node::Any));
    }
    if node.as_iri().is_some() {
        patterns.push(Triple::new(Node::Any, node.clone(), Node::Any));
    }
    patterns.push(Triple::new(Node::Any, Node::Any, node.clone()));
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Node {
        Node::iri(format!("http://e/{s}"))
    }

    fn stmt(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(iri(s), iri(p), iri(o)).unwrap()
    }

    #[test]
    fn test_statement_role_validation() {
        assert!(Statement::new(Node::literal("x"), iri("p"), iri("o")).is_err());
        assert!(Statement::new(iri("s"), Node::blank("b"), iri("o")).is_err());
        assert!(Statement::new(iri("s"), iri("p"), Node::Any).is_err());
        assert!(Statement::new(Node::blank("b"), iri("p"), Node::literal("x")).is_ok());
    }

    #[test]
    fn test_set_operations() {
        let a = Model::mem("http://e/a");
        let b = Model::mem("http://e/b");
        a.add(&stmt("s", "p", "o1")).unwrap();
        a.add(&stmt("s", "p", "o2")).unwrap();
        b.add(&stmt("s", "p", "o2")).unwrap();
        b.add(&stmt("s", "p", "o3")).unwrap();

        assert_eq!(a.union(&b).unwrap().size().unwrap(), 3);
        let inter = a.intersection(&b).unwrap();
        assert_eq!(inter.size().unwrap(), 1);
        assert!(inter.contains(&stmt("s", "p", "o2")).unwrap());
        let diff = a.difference(&b).unwrap();
        assert_eq!(diff.size().unwrap(), 1);
        assert!(diff.contains(&stmt("s", "p", "o1")).unwrap());
    }

    #[test]
    fn test_contains_all_any() {
        let a = Model::mem("http://e/a");
        let b = Model::mem("http://e/b");
        a.add(&stmt("s", "p", "o1")).unwrap();
        a.add(&stmt("s", "p", "o2")).unwrap();
        b.add(&stmt("s", "p", "o2")).unwrap();
        assert!(a.contains_all(&b).unwrap());
        assert!(a.contains_any(&b).unwrap());
        b.add(&stmt("s", "p", "o9")).unwrap();
        assert!(!a.contains_all(&b).unwrap());
        assert!(a.contains_any(&b).unwrap());
    }

    #[test]
    fn test_reification_lifecycle() {
        let m = Model::mem("http://e/m");
        let s = stmt("s", "p", "o");
        let r = m.reify(Some("http://e/r1"), &s).unwrap();
        assert_eq!(m.size().unwrap(), 4);
        assert!(m.is_reified(&s).unwrap());
        assert_eq!(m.reifications_of(&s).unwrap(), vec![r.clone()]);
        assert_eq!(m.reified_statement_of(&r).unwrap(), Some(s.clone()));

        m.remove_reification(&r).unwrap();
        assert!(!m.is_reified(&s).unwrap());
        assert!(m.is_empty().unwrap());
    }

    #[test]
    fn test_incomplete_quad_is_not_reification() {
        let m = Model::mem("http://e/m");
        let s = stmt("s", "p", "o");
        let r = Node::iri("http://e/r1");
        for t in reification_quad(&r, &s).into_iter().take(3) {
            m.graph().add(t).unwrap();
        }
        assert!(!m.is_reified(&s).unwrap());
    }

    #[test]
    fn test_list_round_trip() {
        let m = Model::mem("http://e/m");
        let members = vec![iri("a"), iri("b"), iri("c")];
        let head = m.create_list(&members).unwrap();
        assert_eq!(m.list_members(&head).unwrap(), members);
        assert_eq!(m.size().unwrap(), 6);

        let empty = m.create_list(&[]).unwrap();
        assert_eq!(empty, Node::iri(rdf::NIL));
        assert!(m.list_members(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_container_ops() {
        let m = Model::mem("http://e/m");
        let bag = m.create_container(ContainerKind::Bag, None).unwrap();
        assert_eq!(m.container_add(&bag, &iri("x")).unwrap(), 1);
        assert_eq!(m.container_add(&bag, &iri("y")).unwrap(), 2);
        assert!(m.container_contains(&bag, &iri("x")).unwrap());
        assert_eq!(m.container_size(&bag).unwrap(), 2);

        m.container_remove(&bag, 1, &iri("x")).unwrap();
        assert!(!m.container_contains(&bag, &iri("x")).unwrap());
    }

    #[test]
    fn test_seq_get() {
        let m = Model::mem("http://e/m");
        let seq = m.create_container(ContainerKind::Seq, None).unwrap();
        m.container_add(&seq, &iri("first")).unwrap();
        m.container_add(&seq, &iri("second")).unwrap();
        assert_eq!(m.seq_get(&seq, 2).unwrap(), Some(iri("second")));
        assert_eq!(m.seq_get(&seq, 3).unwrap(), None);
    }

    #[test]
    fn test_query_with_lang() {
        let m = Model::mem("http://e/m");
        let s = iri("s");
        let p = iri("label");
        m.add_literal(&s, &p, Literal::lang_string("chat", "fr"))
            .unwrap();
        m.add_literal(&s, &p, Literal::lang_string("cat", "en"))
            .unwrap();
        m.add_literal(&s, &p, "plain").unwrap();

        let sel = Selector {
            predicate: Some(p.clone()),
            lang: Some("fr".to_string()),
            ..Default::default()
        };
        assert_eq!(m.query(&sel).unwrap().size().unwrap(), 1);

        let untagged = Selector {
            predicate: Some(p),
            lang: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(m.query(&untagged).unwrap().size().unwrap(), 1);
    }

    #[test]
    fn test_ntriples_io() {
        let m = Model::mem("http://e/m");
        m.add(&stmt("s", "p", "o")).unwrap();
        m.add_literal(&iri("s"), &iri("p"), 42i64).unwrap();
        let doc = m.write_ntriples().unwrap();

        let copy = Model::mem("http://e/copy");
        assert_eq!(copy.read_ntriples(&doc).unwrap(), 2);
        assert!(copy.is_isomorphic_with(&m).unwrap());
    }
}
