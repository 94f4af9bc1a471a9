//! Filtered change-event fan-out
//!
//! The secured event manager relays base-graph change events to listeners
//! registered through the façade, suppressing every triple the listener's
//! principal may not read. Each registration captures the ambient principal
//! at registration time; the relay evaluates against that principal on every
//! delivery.
//!
//! The relay subscribes to the base manager when the first listener registers
//! and unsubscribes when the last one leaves. Batch events are delivered as
//! the filtered sub-list, or suppressed entirely when nothing survives.
//! Listener panics are caught and logged; nothing propagates to the base
//! manager.

use crate::checker::PermissionChecker;
use crate::error::Result;
use crate::evaluator::{Action, Principal};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use warden_graph::{Graph, GraphListener, ListenerId, Triple};

/// Handle for a listener registered with the secured manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SecuredListenerId(u64);

struct Entry {
    id: u64,
    principal: Principal,
    listener: Arc<dyn GraphListener>,
}

struct RelayState {
    entries: Vec<Entry>,
    next_id: u64,
    subscription: Option<ListenerId>,
}

struct Relay {
    checker: PermissionChecker,
    state: Mutex<RelayState>,
}

impl Relay {
    fn snapshot(&self) -> Vec<(Principal, Arc<dyn GraphListener>)> {
        self.state
            .lock()
            .expect("listener set poisoned")
            .entries
            .iter()
            .map(|e| (e.principal.clone(), Arc::clone(&e.listener)))
            .collect()
    }

    fn may_read(&self, principal: &Principal, triple: &Triple) -> bool {
        self.checker.evaluator().evaluate_triple(
            principal,
            Action::Read,
            self.checker.graph_iri(),
            triple,
        )
    }

    fn deliver(&self, f: impl FnOnce() + std::panic::UnwindSafe) {
        if catch_unwind(f).is_err() {
            warn!(graph = %self.checker.graph_iri(), "listener panicked during delivery");
        }
    }
}

impl GraphListener for Relay {
    fn triple_added(&self, graph: &str, triple: &Triple) {
        for (principal, listener) in self.snapshot() {
            if self.may_read(&principal, triple) {
                self.deliver(AssertUnwindSafe(|| listener.triple_added(graph, triple)));
            } else {
                debug!(graph, %principal, "suppressed add notification");
            }
        }
    }

    fn triple_deleted(&self, graph: &str, triple: &Triple) {
        for (principal, listener) in self.snapshot() {
            if self.may_read(&principal, triple) {
                self.deliver(AssertUnwindSafe(|| listener.triple_deleted(graph, triple)));
            } else {
                debug!(graph, %principal, "suppressed delete notification");
            }
        }
    }

    fn triples_added(&self, graph: &str, triples: &[Triple]) {
        for (principal, listener) in self.snapshot() {
            let visible: Vec<Triple> = triples
                .iter()
                .filter(|t| self.may_read(&principal, t))
                .cloned()
                .collect();
            if visible.is_empty() {
                debug!(graph, %principal, "suppressed add batch");
                continue;
            }
            self.deliver(AssertUnwindSafe(|| listener.triples_added(graph, &visible)));
        }
    }

    fn triples_deleted(&self, graph: &str, triples: &[Triple]) {
        for (principal, listener) in self.snapshot() {
            let visible: Vec<Triple> = triples
                .iter()
                .filter(|t| self.may_read(&principal, t))
                .cloned()
                .collect();
            if visible.is_empty() {
                debug!(graph, %principal, "suppressed delete batch");
                continue;
            }
            self.deliver(AssertUnwindSafe(|| {
                listener.triples_deleted(graph, &visible)
            }));
        }
    }

    fn event(&self, graph: &str, event: &str) {
        // no triple payload to filter
        for (_, listener) in self.snapshot() {
            self.deliver(AssertUnwindSafe(|| listener.event(graph, event)));
        }
    }
}

/// Permission-filtered event manager for a secured graph.
pub struct SecuredEventManager {
    relay: Arc<Relay>,
    base: Arc<dyn Graph>,
}

impl SecuredEventManager {
    pub(crate) fn new(checker: PermissionChecker, base: Arc<dyn Graph>) -> Self {
        Self {
            relay: Arc::new(Relay {
                checker,
                state: Mutex::new(RelayState {
                    entries: Vec::new(),
                    next_id: 0,
                    subscription: None,
                }),
            }),
            base,
        }
    }

    /// Register a listener on behalf of the current principal
    ///
    /// The principal is captured now and used to filter every later
    /// delivery. The first registration subscribes the relay to the base
    /// event manager.
    pub fn register(&self, listener: Arc<dyn GraphListener>) -> Result<SecuredListenerId> {
        let principal = self.relay.checker.principal()?;
        let mut state = self.relay.state.lock().expect("listener set poisoned");
        let id = state.next_id;
        state.next_id += 1;
        state.entries.push(Entry {
            id,
            principal,
            listener,
        });
        if state.subscription.is_none() {
            let relay: Arc<dyn GraphListener> = self.relay.clone();
            state.subscription = Some(self.base.event_manager().register(relay));
        }
        Ok(SecuredListenerId(id))
    }

    /// Remove a listener; the last removal unsubscribes from the base
    pub fn unregister(&self, id: SecuredListenerId) {
        let mut state = self.relay.state.lock().expect("listener set poisoned");
        state.entries.retain(|e| e.id != id.0);
        if state.entries.is_empty() {
            if let Some(sub) = state.subscription.take() {
                self.base.event_manager().unregister(sub);
            }
        }
    }

    /// True when at least one listener is registered through this façade
    pub fn has_listeners(&self) -> bool {
        !self
            .relay
            .state
            .lock()
            .expect("listener set poisoned")
            .entries
            .is_empty()
    }

    /// Signal an application-defined event on the base graph
    pub fn notify_event(&self, event: &str) {
        self.base
            .event_manager()
            .notify_event(self.base.graph_iri(), event);
    }
}

impl std::fmt::Debug for SecuredEventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredEventManager")
            .field("graph", &self.base.graph_iri())
            .field("has_listeners", &self.has_listeners())
            .finish()
    }
}
