//! In-memory reference graph
//!
//! [`MemGraph`] is the reference [`Graph`] implementation: a `HashSet` of
//! triples behind an `RwLock`, with change events, a prefix mapping, and
//! blank-node-aware isomorphism. It backs the test suites and serves as the
//! default base store for façades.

use crate::error::{GraphError, Result};
use crate::event::GraphEventManager;
use crate::graph::{same_graph, Graph, NoTransactions, TransactionHandler, TripleIter};
use crate::node::Node;
use crate::prefix::PrefixMapping;
use crate::triple::Triple;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// An in-memory graph of concrete triples.
pub struct MemGraph {
    iri: String,
    triples: RwLock<HashSet<Triple>>,
    prefixes: PrefixMapping,
    events: GraphEventManager,
    txn: NoTransactions,
    closed: AtomicBool,
}

impl MemGraph {
    /// Create an empty graph identified by `iri`
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            triples: RwLock::new(HashSet::new()),
            prefixes: PrefixMapping::new(),
            events: GraphEventManager::new(),
            txn: NoTransactions,
            closed: AtomicBool::new(false),
        }
    }

    fn guard_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(GraphError::closed(&self.iri))
        } else {
            Ok(())
        }
    }

    fn snapshot(&self) -> HashSet<Triple> {
        self.triples.read().expect("triple set poisoned").clone()
    }
}

impl Graph for MemGraph {
    fn graph_iri(&self) -> &str {
        &self.iri
    }

    fn add(&self, triple: Triple) -> Result<()> {
        self.guard_open()?;
        if !triple.is_concrete() {
            return Err(GraphError::term(format!(
                "cannot add non-concrete triple {triple}"
            )));
        }
        let inserted = self
            .triples
            .write()
            .expect("triple set poisoned")
            .insert(triple.clone());
        if inserted {
            self.events.notify_add(&self.iri, &triple);
        }
        Ok(())
    }

    fn delete(&self, triple: &Triple) -> Result<()> {
        self.guard_open()?;
        let removed = self
            .triples
            .write()
            .expect("triple set poisoned")
            .remove(triple);
        if removed {
            self.events.notify_delete(&self.iri, triple);
        }
        Ok(())
    }

    fn find<'a>(&'a self, pattern: &Triple) -> Result<TripleIter<'a>> {
        self.guard_open()?;
        let pattern = pattern.clone();
        let matching: Vec<Triple> = self
            .triples
            .read()
            .expect("triple set poisoned")
            .iter()
            .filter(|t| pattern.matches(t))
            .cloned()
            .collect();
        Ok(Box::new(matching.into_iter()))
    }

    fn contains(&self, triple: &Triple) -> Result<bool> {
        self.guard_open()?;
        if triple.is_concrete() {
            Ok(self
                .triples
                .read()
                .expect("triple set poisoned")
                .contains(triple))
        } else {
            Ok(self
                .triples
                .read()
                .expect("triple set poisoned")
                .iter()
                .any(|t| triple.matches(t)))
        }
    }

    fn size(&self) -> Result<usize> {
        self.guard_open()?;
        Ok(self.triples.read().expect("triple set poisoned").len())
    }

    fn is_isomorphic_with(&self, other: &dyn Graph) -> Result<bool> {
        self.guard_open()?;
        let mine = self.snapshot();
        let theirs: HashSet<Triple> = other.find(&Triple::any())?.collect();
        Ok(isomorphic(&mine, &theirs))
    }

    fn clear(&self) -> Result<()> {
        self.guard_open()?;
        let drained: Vec<Triple> = self
            .triples
            .write()
            .expect("triple set poisoned")
            .drain()
            .collect();
        self.events.notify_delete_batch(&self.iri, &drained);
        Ok(())
    }

    fn remove(&self, pattern: &Triple) -> Result<()> {
        self.guard_open()?;
        let removed: Vec<Triple> = {
            let mut set = self.triples.write().expect("triple set poisoned");
            let matching: Vec<Triple> =
                set.iter().filter(|t| pattern.matches(t)).cloned().collect();
            for t in &matching {
                set.remove(t);
            }
            matching
        };
        self.events.notify_delete_batch(&self.iri, &removed);
        Ok(())
    }

    fn prefix_mapping(&self) -> &PrefixMapping {
        &self.prefixes
    }

    fn event_manager(&self) -> &GraphEventManager {
        &self.events
    }

    fn transaction_handler(&self) -> &dyn TransactionHandler {
        &self.txn
    }

    fn statistic(&self, pattern: &Triple) -> Option<u64> {
        let set = self.triples.read().expect("triple set poisoned");
        Some(set.iter().filter(|t| pattern.matches(t)).count() as u64)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn depends_on(&self, other: &dyn Graph) -> bool {
        same_graph(self, other)
    }
}

impl std::fmt::Debug for MemGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemGraph")
            .field("iri", &self.iri)
            .field(
                "size",
                &self.triples.read().expect("triple set poisoned").len(),
            )
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Blank-node-aware graph isomorphism.
///
/// Ground triples (no blank components) must be equal as sets. Triples with
/// blank components are matched by searching for a label bijection, with
/// backtracking. Exponential in the worst case, which is acceptable for the
/// reference store.
pub fn isomorphic(a: &HashSet<Triple>, b: &HashSet<Triple>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let (ground_a, blank_a): (Vec<_>, Vec<_>) = a.iter().partition(|t| !t.has_blank());
    let (ground_b, blank_b): (Vec<_>, Vec<_>) = b.iter().partition(|t| !t.has_blank());
    if ground_a.len() != ground_b.len() {
        return false;
    }
    let ground_b_set: HashSet<&Triple> = ground_b.into_iter().collect();
    if !ground_a.iter().all(|t| ground_b_set.contains(*t)) {
        return false;
    }
    let mut mapping = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    match_blanks(&blank_a, &blank_b, &mut mapping, &mut used)
}

fn match_blanks(
    remaining: &[&Triple],
    candidates: &[&Triple],
    mapping: &mut HashMap<String, String>,
    used: &mut HashSet<String>,
) -> bool {
    let Some((first, rest)) = remaining.split_first() else {
        return true;
    };
    for candidate in candidates {
        let Some(new_pairs) = blank_match(first, candidate, mapping, used) else {
            continue;
        };
        for (from, to) in &new_pairs {
            mapping.insert(from.clone(), to.clone());
            used.insert(to.clone());
        }
        if match_blanks(rest, candidates, mapping, used) {
            return true;
        }
        for (from, to) in &new_pairs {
            mapping.remove(from);
            used.remove(to);
        }
    }
    false
}

// Component-wise match under the current bijection; returns the new label
// pairs this match would commit, or None if incompatible.
fn blank_match(
    a: &Triple,
    b: &Triple,
    mapping: &HashMap<String, String>,
    used: &HashSet<String>,
) -> Option<Vec<(String, String)>> {
    let mut new_pairs = Vec::new();
    for (na, nb) in [(&a.s, &b.s), (&a.p, &b.p), (&a.o, &b.o)] {
        match (na, nb) {
            (Node::Blank(la), Node::Blank(lb)) => match mapping.get(la) {
                Some(existing) if existing == lb => {}
                Some(_) => return None,
                None => {
                    if used.contains(lb)
                        || new_pairs
                            .iter()
                            .any(|(f, t): &(String, String)| f == la || t == lb)
                    {
                        // a label can pair with at most one counterpart
                        if !new_pairs.iter().any(|(f, t)| f == la && t == lb) {
                            return None;
                        }
                    } else {
                        new_pairs.push((la.clone(), lb.clone()));
                    }
                }
            },
            (Node::Blank(_), _) | (_, Node::Blank(_)) => return None,
            _ if na == nb => {}
            _ => return None,
        }
    }
    Some(new_pairs)
}
