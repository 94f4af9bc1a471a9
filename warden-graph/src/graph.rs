//! The base graph abstraction
//!
//! [`Graph`] is the capability set a triple store must implement to sit
//! behind the model layer or a security façade. Implementations use interior
//! mutability: all operations take `&self` so a graph can be shared through
//! `Arc<dyn Graph>`.
//!
//! Iterators returned by [`Graph::find`] are finite, not restartable, and
//! release their underlying resources on drop.

use crate::error::Result;
use crate::event::GraphEventManager;
use crate::prefix::PrefixMapping;
use crate::triple::Triple;

/// A lazy, finite sequence of triples borrowed from a graph.
pub type TripleIter<'a> = Box<dyn Iterator<Item = Triple> + 'a>;

/// Transaction capability of a graph.
///
/// Stores without transactions report `transactions_supported() == false`
/// and fail the control operations; callers fall back to pre-checking.
pub trait TransactionHandler: Send + Sync {
    /// True when begin/commit/abort are usable
    fn transactions_supported(&self) -> bool;

    /// Start a transaction
    fn begin(&self) -> Result<()>;

    /// Commit the current transaction
    fn commit(&self) -> Result<()>;

    /// Abort the current transaction
    fn abort(&self) -> Result<()>;
}

/// Transaction handler for stores with no transaction support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTransactions;

impl TransactionHandler for NoTransactions {
    fn transactions_supported(&self) -> bool {
        false
    }

    fn begin(&self) -> Result<()> {
        Err(crate::error::GraphError::unsupported("transactions"))
    }

    fn commit(&self) -> Result<()> {
        Err(crate::error::GraphError::unsupported("transactions"))
    }

    fn abort(&self) -> Result<()> {
        Err(crate::error::GraphError::unsupported("transactions"))
    }
}

/// A set of concrete triples with an associated IRI and prefix mapping.
pub trait Graph: Send + Sync {
    /// The IRI identifying this graph
    fn graph_iri(&self) -> &str;

    /// Add a concrete triple; duplicates are ignored
    fn add(&self, triple: Triple) -> Result<()>;

    /// Delete a concrete triple; absent triples are ignored
    fn delete(&self, triple: &Triple) -> Result<()>;

    /// All triples matching `pattern` (wildcards match any node)
    fn find<'a>(&'a self, pattern: &Triple) -> Result<TripleIter<'a>>;

    /// True when the concrete triple is present
    fn contains(&self, triple: &Triple) -> Result<bool>;

    /// Number of triples in the graph
    fn size(&self) -> Result<usize>;

    /// True when the graph holds no triples
    fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Blank-node-aware isomorphism with another graph
    fn is_isomorphic_with(&self, other: &dyn Graph) -> Result<bool>;

    /// Remove every triple
    fn clear(&self) -> Result<()>;

    /// Remove every triple matching `pattern`
    fn remove(&self, pattern: &Triple) -> Result<()>;

    /// The graph's prefix mapping (shared, interior-mutable)
    fn prefix_mapping(&self) -> &PrefixMapping;

    /// The graph's event manager
    fn event_manager(&self) -> &GraphEventManager;

    /// The graph's transaction capability
    fn transaction_handler(&self) -> &dyn TransactionHandler;

    /// Count of triples matching `pattern`, when the store tracks it cheaply
    fn statistic(&self, _pattern: &Triple) -> Option<u64> {
        None
    }

    /// Release the graph; subsequent operations fail with `Closed`
    fn close(&self);

    /// True once the graph has been closed
    fn is_closed(&self) -> bool;

    /// True when this graph is backed (in whole or part) by `other`
    ///
    /// Implementations that wrap no other store return `same_graph(self, other)`.
    fn depends_on(&self, other: &dyn Graph) -> bool;
}

/// True when `a` and `b` are the same graph object.
///
/// Identity is by address of the underlying object, which is stable for
/// graphs shared through `Arc`.
pub fn same_graph(a: &dyn Graph, b: &dyn Graph) -> bool {
    std::ptr::addr_eq(a as *const dyn Graph, b as *const dyn Graph)
}
