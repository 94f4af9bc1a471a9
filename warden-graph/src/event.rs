//! Graph change events
//!
//! Graphs fire change notifications through a [`GraphEventManager`].
//! Listeners implement [`GraphListener`]; batch notifications default to
//! per-triple delivery but can be overridden to observe whole batches.
//!
//! Registration returns a [`ListenerId`] used to unregister. The listener set
//! is guarded by a mutex; notification snapshots the set before delivering so
//! listeners may re-register without deadlocking.

use crate::triple::Triple;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle for a registered listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Observer of graph changes
pub trait GraphListener: Send + Sync {
    /// A single triple was added
    fn triple_added(&self, graph: &str, triple: &Triple);

    /// A single triple was deleted
    fn triple_deleted(&self, graph: &str, triple: &Triple);

    /// A batch of triples was added (e.g. bulk add or graph merge)
    fn triples_added(&self, graph: &str, triples: &[Triple]) {
        for t in triples {
            self.triple_added(graph, t);
        }
    }

    /// A batch of triples was deleted
    fn triples_deleted(&self, graph: &str, triples: &[Triple]) {
        for t in triples {
            self.triple_deleted(graph, t);
        }
    }

    /// An application-defined event was signalled on the graph
    fn event(&self, graph: &str, _event: &str) {
        let _ = graph;
    }
}

/// Fan-out of change notifications to registered listeners.
#[derive(Default)]
pub struct GraphEventManager {
    listeners: Mutex<Vec<(ListenerId, Arc<dyn GraphListener>)>>,
    next_id: AtomicU64,
}

impl GraphEventManager {
    /// Create an event manager with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns the id used to unregister it
    pub fn register(&self, listener: Arc<dyn GraphListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .expect("listener set poisoned")
            .push((id, listener));
        id
    }

    /// Remove a previously registered listener
    pub fn unregister(&self, id: ListenerId) {
        self.listeners
            .lock()
            .expect("listener set poisoned")
            .retain(|(lid, _)| *lid != id);
    }

    /// True when at least one listener is registered
    pub fn has_listeners(&self) -> bool {
        !self.listeners.lock().expect("listener set poisoned").is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn GraphListener>> {
        self.listeners
            .lock()
            .expect("listener set poisoned")
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect()
    }

    /// Notify all listeners of a single added triple
    pub fn notify_add(&self, graph: &str, triple: &Triple) {
        for l in self.snapshot() {
            l.triple_added(graph, triple);
        }
    }

    /// Notify all listeners of a single deleted triple
    pub fn notify_delete(&self, graph: &str, triple: &Triple) {
        for l in self.snapshot() {
            l.triple_deleted(graph, triple);
        }
    }

    /// Notify all listeners of a batch of added triples
    pub fn notify_add_batch(&self, graph: &str, triples: &[Triple]) {
        if triples.is_empty() {
            return;
        }
        for l in self.snapshot() {
            l.triples_added(graph, triples);
        }
    }

    /// Notify all listeners of a batch of deleted triples
    pub fn notify_delete_batch(&self, graph: &str, triples: &[Triple]) {
        if triples.is_empty() {
            return;
        }
        for l in self.snapshot() {
            l.triples_deleted(graph, triples);
        }
    }

    /// Forward an application-defined event
    pub fn notify_event(&self, graph: &str, event: &str) {
        for l in self.snapshot() {
            l.event(graph, event);
        }
    }
}

impl std::fmt::Debug for GraphEventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEventManager")
            .field(
                "listeners",
                &self.listeners.lock().expect("listener set poisoned").len(),
            )
            .finish()
    }
}
