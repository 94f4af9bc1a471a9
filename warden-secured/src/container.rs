//! Secured containers (Bag, Alt, Seq)
//!
//! Container membership is plain triples: element `i` of container `c` is
//! `(c, rdf:_i, value)`. The secured views decompose every container
//! operation into those triples and run the usual checks: Update + Create to
//! add, Update + Delete to remove, Read to observe membership. `Seq::set`
//! asks the evaluator for an atomic replace first and falls back to the
//! Delete + Create decomposition.

use crate::error::{AccessError, Result};
use crate::evaluator::future_node;
use crate::model::SecuredModel;
use std::fmt;
use warden_graph::{ContainerKind, Node, Triple};
use warden_vocab::rdf;

/// Permission-checked view of a Bag, Alt, or Seq.
pub struct SecuredContainer<'a> {
    model: &'a SecuredModel,
    node: Node,
    kind: ContainerKind,
}

impl<'a> SecuredContainer<'a> {
    pub(crate) fn new(model: &'a SecuredModel, node: Node, kind: ContainerKind) -> Self {
        Self { model, node, kind }
    }

    /// The container resource
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The container flavor
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn membership_triple(&self, index: u32, value: &Node) -> Triple {
        Triple::new(
            self.node.clone(),
            Node::iri(rdf::member(index)),
            value.clone(),
        )
    }

    /// Append `value` at the next free index: Update + Create
    pub fn add(&self, value: &Node) -> Result<u32> {
        self.model.checker().check_update()?;
        let next = self
            .model
            .base()
            .container_members(&self.node)?
            .last()
            .map(|(i, _)| i + 1)
            .unwrap_or(1);
        let t = self.membership_triple(next, value);
        self.model.checker().check_create(&t)?;
        self.model.base().graph().add(t)?;
        Ok(next)
    }

    /// Remove the membership triple at `index` holding `value`: Update + Delete
    pub fn remove(&self, index: u32, value: &Node) -> Result<()> {
        self.model.checker().check_update()?;
        let t = self.membership_triple(index, value);
        self.model.checker().check_delete(&t)?;
        self.model.base().graph().delete(&t)?;
        Ok(())
    }

    /// Readable membership entries, sorted by index
    pub fn iter(&self) -> Result<Vec<(u32, Node)>> {
        if !self.model.checker().check_read()? {
            return Ok(Vec::new());
        }
        let blanket = self.model.checker().can_read_any()?;
        let mut out = Vec::new();
        for (i, v) in self.model.base().container_members(&self.node)? {
            if blanket
                || self
                    .model
                    .checker()
                    .can_read_triple(&self.membership_triple(i, &v))?
            {
                out.push((i, v));
            }
        }
        Ok(out)
    }

    /// Number of readable membership triples
    pub fn size(&self) -> Result<usize> {
        Ok(self.iter()?.len())
    }

    /// True when a readable membership triple holds `value`
    pub fn contains(&self, value: &Node) -> Result<bool> {
        Ok(self.iter()?.iter().any(|(_, v)| v == value))
    }
}

impl fmt::Debug for SecuredContainer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuredContainer")
            .field("node", &self.node)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Permission-checked view of a Seq, adding index-addressed operations.
pub struct SecuredSeq<'a> {
    inner: SecuredContainer<'a>,
}

impl<'a> SecuredSeq<'a> {
    pub(crate) fn new(model: &'a SecuredModel, node: Node) -> Self {
        Self {
            inner: SecuredContainer::new(model, node, ContainerKind::Seq),
        }
    }

    /// The underlying container view
    pub fn container(&self) -> &SecuredContainer<'a> {
        &self.inner
    }

    /// The readable value at `index`
    pub fn get(&self, index: u32) -> Result<Option<Node>> {
        Ok(self
            .inner
            .iter()?
            .into_iter()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| v))
    }

    /// The lowest readable index holding `value`
    pub fn index_of(&self, value: &Node) -> Result<Option<u32>> {
        Ok(self
            .inner
            .iter()?
            .into_iter()
            .find(|(_, v)| v == value)
            .map(|(i, _)| i))
    }

    /// Replace the value at `index`: Update, then atomic replace or
    /// Delete + Create
    pub fn set(&self, index: u32, value: &Node) -> Result<()> {
        let model = self.inner.model;
        model.checker().check_update()?;
        let to = self.inner.membership_triple(index, value);
        let Some(old) = model.base().seq_get(&self.inner.node, index)? else {
            model.checker().check_create(&to)?;
            model.base().graph().add(to)?;
            return Ok(());
        };
        let from = self.inner.membership_triple(index, &old);
        if !model.checker().can_replace(&from, &to)? {
            // surface the precise component denial before the generic one
            model.checker().check_delete(&from)?;
            model.checker().check_create(&to)?;
            return Err(AccessError::update_denied(model.graph_iri()));
        }
        model.base().graph().delete(&from)?;
        model.base().graph().add(to)?;
        Ok(())
    }
}

impl fmt::Debug for SecuredSeq<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuredSeq")
            .field("node", &self.inner.node)
            .finish()
    }
}

impl SecuredModel {
    fn create_container_checked(
        &self,
        kind: ContainerKind,
        uri: Option<&str>,
    ) -> Result<Node> {
        self.checker().check_update()?;
        let check_root = match uri {
            Some(u) => Node::iri(u),
            None => future_node(),
        };
        self.checker().check_create(&Triple::new(
            check_root,
            Node::iri(rdf::TYPE),
            Node::iri(kind.type_iri()),
        ))?;
        Ok(self.base().create_container(kind, uri)?)
    }

    /// Create a Bag: Update + Create of its type triple
    pub fn create_bag(&self, uri: Option<&str>) -> Result<SecuredContainer<'_>> {
        let node = self.create_container_checked(ContainerKind::Bag, uri)?;
        Ok(SecuredContainer::new(self, node, ContainerKind::Bag))
    }

    /// Create an Alt: Update + Create of its type triple
    pub fn create_alt(&self, uri: Option<&str>) -> Result<SecuredContainer<'_>> {
        let node = self.create_container_checked(ContainerKind::Alt, uri)?;
        Ok(SecuredContainer::new(self, node, ContainerKind::Alt))
    }

    /// Create a Seq: Update + Create of its type triple
    pub fn create_seq(&self, uri: Option<&str>) -> Result<SecuredSeq<'_>> {
        let node = self.create_container_checked(ContainerKind::Seq, uri)?;
        Ok(SecuredSeq::new(self, node))
    }

    /// View an existing resource as a container
    pub fn container(&self, node: Node, kind: ContainerKind) -> SecuredContainer<'_> {
        SecuredContainer::new(self, node, kind)
    }

    /// View an existing resource as a Seq
    pub fn seq(&self, node: Node) -> SecuredSeq<'_> {
        SecuredSeq::new(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{Action, Principal, StaticEvaluator};
    use std::sync::Arc;
    use warden_graph::MemGraph;

    fn iri(s: &str) -> Node {
        Node::iri(format!("http://e/{s}"))
    }

    fn model_with(evaluator: StaticEvaluator) -> SecuredModel {
        SecuredModel::new(Arc::new(evaluator), Arc::new(MemGraph::new("http://e/g")))
    }

    #[test]
    fn test_bag_add_contains_remove() {
        let m = model_with(StaticEvaluator::allow_all(Principal::named("alice")));
        let bag = m.create_bag(None).unwrap();
        assert_eq!(bag.add(&iri("x")).unwrap(), 1);
        assert_eq!(bag.add(&iri("y")).unwrap(), 2);
        assert!(bag.contains(&iri("x")).unwrap());
        assert_eq!(bag.size().unwrap(), 2);
        bag.remove(1, &iri("x")).unwrap();
        assert!(!bag.contains(&iri("x")).unwrap());
    }

    #[test]
    fn test_add_requires_update_and_create() {
        let m = model_with(StaticEvaluator::allow_all(Principal::named("alice")));
        let bag = m.create_bag(Some("http://e/bag")).unwrap();

        let read_only = model_with(StaticEvaluator::new(
            Principal::named("bob"),
            [Action::Read],
        ));
        read_only
            .base()
            .add_model(m.base())
            .expect("copy base content");
        let view = read_only.container(bag.node().clone(), ContainerKind::Bag);
        assert!(matches!(
            view.add(&iri("x")),
            Err(AccessError::UpdateDenied { .. })
        ));
    }

    #[test]
    fn test_membership_filtered_by_read() {
        let m = model_with(
            StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
                |_, _, triple| triple.is_concrete() && triple.o != Node::iri("http://e/hidden"),
            ),
        );
        let bag = m.create_bag(None).unwrap();
        bag.add(&iri("shown")).unwrap();
        m.base()
            .container_add(bag.node(), &iri("hidden"))
            .unwrap();

        assert_eq!(bag.size().unwrap(), 1);
        assert!(!bag.contains(&iri("hidden")).unwrap());
        assert_eq!(bag.iter().unwrap().len(), 1);
    }

    #[test]
    fn test_seq_set_replaces() {
        let m = model_with(StaticEvaluator::allow_all(Principal::named("alice")));
        let seq = m.create_seq(None).unwrap();
        seq.container().add(&iri("a")).unwrap();
        seq.container().add(&iri("b")).unwrap();

        seq.set(1, &iri("a2")).unwrap();
        assert_eq!(seq.get(1).unwrap(), Some(iri("a2")));
        assert_eq!(seq.index_of(&iri("b")).unwrap(), Some(2));

        // setting past the end behaves as an insert
        seq.set(3, &iri("c")).unwrap();
        assert_eq!(seq.get(3).unwrap(), Some(iri("c")));
    }

    #[test]
    fn test_seq_set_denied_delete_aborts() {
        let m = model_with(
            StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
                |_, action, triple| {
                    !(action == Action::Delete && triple.o == Node::iri("http://e/pinned"))
                },
            ),
        );
        let seq = m.create_seq(None).unwrap();
        seq.container().add(&iri("pinned")).unwrap();

        assert!(matches!(
            seq.set(1, &iri("other")),
            Err(AccessError::DeleteDenied { .. })
        ));
        assert_eq!(seq.get(1).unwrap(), Some(iri("pinned")));
    }
}
