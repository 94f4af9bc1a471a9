//! The secured graph façade
//!
//! [`SecuredGraph`] mirrors the base [`Graph`] surface with every operation
//! routed through the permission checker. Mutations reach the base only after
//! all required checks pass; reads either delegate (when the principal may
//! read any triple) or filter per element.
//!
//! The façade holds no graph state of its own beyond the lazily created
//! prefix-mapping façade and the event manager.

use crate::checker::PermissionChecker;
use crate::error::Result;
use crate::event::SecuredEventManager;
use crate::evaluator::SecurityEvaluator;
use crate::iter::SecuredTripleIter;
use crate::prefix::SecuredPrefixMapping;
use std::sync::{Arc, OnceLock};
use warden_graph::{same_graph, Graph, MemGraph, TransactionHandler, Triple};

/// Per-triple, per-operation access control over a base graph.
pub struct SecuredGraph {
    base: Arc<dyn Graph>,
    checker: PermissionChecker,
    prefix: OnceLock<SecuredPrefixMapping>,
    events: SecuredEventManager,
}

impl SecuredGraph {
    /// Wrap `base`, mediating every operation through `evaluator`
    pub fn new(evaluator: Arc<dyn SecurityEvaluator>, base: Arc<dyn Graph>) -> Self {
        let checker = PermissionChecker::new(evaluator, base.graph_iri());
        let events = SecuredEventManager::new(checker.clone(), Arc::clone(&base));
        Self {
            base,
            checker,
            prefix: OnceLock::new(),
            events,
        }
    }

    /// The IRI of the wrapped graph
    pub fn graph_iri(&self) -> &str {
        self.checker.graph_iri()
    }

    /// The wrapped graph
    pub fn base(&self) -> &Arc<dyn Graph> {
        &self.base
    }

    /// The checker bound to this graph
    pub(crate) fn checker(&self) -> &PermissionChecker {
        &self.checker
    }

    // ------------------------------------------------------------------
    // mutation
    // ------------------------------------------------------------------

    /// Add a triple: Update on the graph, Create on the triple
    pub fn add(&self, triple: Triple) -> Result<()> {
        self.checker.check_update()?;
        self.checker.check_create(&triple)?;
        self.base.add(triple)?;
        Ok(())
    }

    /// Delete a triple: Update on the graph, Delete on the triple
    pub fn delete(&self, triple: &Triple) -> Result<()> {
        self.checker.check_update()?;
        self.checker.check_delete(triple)?;
        self.base.delete(triple)?;
        Ok(())
    }

    /// Remove every triple: Update, plus Delete on each when the principal
    /// may not delete arbitrary triples
    ///
    /// Any denial aborts before the base is touched.
    pub fn clear(&self) -> Result<()> {
        self.checker.check_update()?;
        if !self.checker.can_delete_any()? {
            for t in self.base.find(&Triple::any())? {
                self.checker.check_delete(&t)?;
            }
        }
        self.base.clear()?;
        Ok(())
    }

    /// Remove every triple matching `pattern`
    ///
    /// A concrete pattern needs one Delete check; a wildcard pattern is
    /// promoted to enumeration with a Delete check per match. Any denial
    /// aborts before the base is touched.
    pub fn remove(&self, pattern: &Triple) -> Result<()> {
        self.checker.check_update()?;
        if pattern.is_concrete() {
            self.checker.check_delete(pattern)?;
        } else {
            for t in self.base.find(pattern)? {
                self.checker.check_delete(&t)?;
            }
        }
        self.base.remove(pattern)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // reading
    // ------------------------------------------------------------------

    /// True when `triple` is present and readable
    pub fn contains(&self, triple: &Triple) -> Result<bool> {
        if !self.checker.check_read()? {
            return Ok(false);
        }
        if self.checker.can_read_triple(triple)? {
            return Ok(self.base.contains(triple)?);
        }
        // the pattern itself is not blanket-readable: look for one readable
        // concrete match
        for t in self.base.find(triple)? {
            if self.checker.can_read_triple(&t)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Readable triples matching `pattern`
    pub fn find(&self, pattern: &Triple) -> Result<SecuredTripleIter<'_>> {
        if !self.checker.check_read()? {
            return Ok(SecuredTripleIter::empty(self.checker.clone()));
        }
        let inner = self.base.find(pattern)?;
        if self.checker.can_read_any()? {
            Ok(SecuredTripleIter::pass_through(self.checker.clone(), inner))
        } else {
            let principal = self.checker.principal()?;
            Ok(SecuredTripleIter::filtered(
                self.checker.clone(),
                principal,
                inner,
            ))
        }
    }

    /// Size of the readable projection
    pub fn size(&self) -> Result<usize> {
        if !self.checker.check_read()? {
            return Ok(0);
        }
        if self.checker.can_read_any()? {
            return Ok(self.base.size()?);
        }
        Ok(self.find(&Triple::any())?.count())
    }

    /// True when the readable projection is empty
    pub fn is_empty(&self) -> Result<bool> {
        if !self.checker.check_read()? {
            return Ok(true);
        }
        if self.checker.can_read_any()? {
            return Ok(self.base.is_empty()?);
        }
        Ok(self.find(&Triple::any())?.next().is_none())
    }

    /// Isomorphism restricted to the readable projection
    ///
    /// With blanket read permission this compares sizes then delegates to the
    /// base. Otherwise the comparison runs between the extracted readable
    /// projection and `other`; an unreadable triple in `other` makes the
    /// answer `false`, never an error.
    pub fn is_isomorphic_with(&self, other: &dyn Graph) -> Result<bool> {
        if !self.checker.check_read()? {
            return Ok(false);
        }
        if self.checker.can_read_any()? {
            if self.base.size()? != other.size()? {
                return Ok(false);
            }
            return Ok(self.base.is_isomorphic_with(other)?);
        }
        for t in other.find(&Triple::any())? {
            if !self.checker.can_read_triple(&t)? {
                return Ok(false);
            }
        }
        let projection = self.readable_projection()?;
        if projection.size()? != other.size()? {
            return Ok(false);
        }
        Ok(projection.is_isomorphic_with(other)?)
    }

    /// Materialize the readable projection into a fresh in-memory graph
    pub(crate) fn readable_projection(&self) -> Result<MemGraph> {
        let projection = MemGraph::new(self.graph_iri());
        for t in self.find(&Triple::any())? {
            projection.add(t)?;
        }
        Ok(projection)
    }

    /// True when this façade is backed by `other`
    pub fn depends_on(&self, other: &dyn Graph) -> Result<bool> {
        if !self.checker.check_read()? {
            return Ok(false);
        }
        Ok(same_graph(self.base.as_ref(), other) || self.base.depends_on(other))
    }

    /// Count of matching triples, when it can be answered without leaking
    ///
    /// Delegates to the base only under blanket read permission; a filtered
    /// count cannot come from base statistics.
    pub fn statistic(&self, pattern: &Triple) -> Result<Option<u64>> {
        if !self.checker.check_read()? {
            return Ok(None);
        }
        if self.checker.can_read_any()? {
            return Ok(self.base.statistic(pattern));
        }
        Ok(None)
    }

    // ------------------------------------------------------------------
    // handlers and lifecycle
    // ------------------------------------------------------------------

    /// The secured prefix-mapping façade, created on first use
    pub fn prefix_mapping(&self) -> &SecuredPrefixMapping {
        self.prefix.get_or_init(|| {
            SecuredPrefixMapping::new(self.checker.clone(), Arc::clone(&self.base))
        })
    }

    /// The secured event manager
    pub fn event_manager(&self) -> &SecuredEventManager {
        &self.events
    }

    /// The base transaction handler, unmediated
    pub fn transaction_handler(&self) -> &dyn TransactionHandler {
        self.base.transaction_handler()
    }

    /// Close the base graph; requires no authorization
    pub fn close(&self) {
        self.base.close()
    }

    /// True once the base graph is closed
    pub fn is_closed(&self) -> bool {
        self.base.is_closed()
    }
}

impl std::fmt::Debug for SecuredGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredGraph")
            .field("graph", &self.graph_iri())
            .finish()
    }
}
