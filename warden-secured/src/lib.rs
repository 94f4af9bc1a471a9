//! # Warden Secured
//!
//! A permissioned façade over RDF graphs: every read, update, add, and
//! delete routed through a [`SecuredGraph`] or [`SecuredModel`] is mediated
//! by a pluggable [`SecurityEvaluator`] deciding, for the ambient principal,
//! whether the operation is permitted on the graph as a whole and on each
//! individual triple touched.
//!
//! # Core Types
//!
//! - [`SecurityEvaluator`]: the authorization contract (graph-level and
//!   triple-level decisions, hard/soft read mode, ambient principal)
//! - [`PermissionChecker`]: the canonical check helpers the façades share
//! - [`SecuredGraph`] / [`SecuredModel`]: the façade surface, mirroring the
//!   base graph/model operations with typed denials
//! - [`SecuredTripleIter`]: lazy read-filtered iteration; forbidden triples
//!   never escape, not even through `size`, `is_empty`, containment, or
//!   isomorphism short-circuits
//! - [`SecuredEventManager`]: change-event fan-out that suppresses
//!   notifications the listener's principal may not see
//!
//! # Enforcement Semantics
//!
//! 1. **Fail-closed**: a failing check raises before any side effect; bulk
//!    operations pre-check every element, so denials leave the base unchanged
//! 2. **Non-leakage**: results, counts, emptiness, isomorphism, and events
//!    reflect only the readable projection of the base graph
//! 3. **Blanket-read fast path**: when the principal may read the wildcard
//!    triple, iterators pass through without per-element checks
//! 4. **Soft vs hard read**: evaluators choose whether denied reads raise
//!    [`AccessError::ReadDenied`] or silently produce empty results
//! 5. **Derived triples**: reifications, RDF lists, and containers decompose
//!    into their constituent triples for checking, using the wildcard,
//!    ignore, and future markers for not-yet-materialized resources
//!
//! # Usage
//!
//! Wrap any `Arc<dyn Graph>` with [`SecuredModel::new`] and an evaluator.
//! [`OpenEvaluator`] permits everything; [`StaticEvaluator`] is a
//! table-driven building block; production embeddings implement
//! [`SecurityEvaluator`] against their own policy store.

pub mod checker;
pub mod container;
pub mod error;
pub mod evaluator;
pub mod event;
pub mod graph;
pub mod iter;
pub mod model;
pub mod prefix;

pub use checker::PermissionChecker;
pub use container::{SecuredContainer, SecuredSeq};
pub use error::{AccessError, Result};
pub use evaluator::{
    future_node, ignore_node, Action, OpenEvaluator, Principal, SecurityEvaluator,
    StaticEvaluator, TripleRule, FUTURE_LABEL, IGNORE_IRI,
};
pub use event::{SecuredEventManager, SecuredListenerId};
pub use graph::SecuredGraph;
pub use iter::SecuredTripleIter;
pub use model::{SecuredModel, SecuredStatementIter};
pub use prefix::SecuredPrefixMapping;
