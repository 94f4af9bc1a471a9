//! Access-control error types
//!
//! Denials carry the offending triple where one exists. Base-graph errors
//! flow through unchanged via [`AccessError::Graph`]. No variant exposes
//! information about triples other than the one the caller acted on.

use thiserror::Error;
use warden_graph::{GraphError, Node, Triple};

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, AccessError>;

/// Errors raised by the secured façade
#[derive(Error, Debug)]
pub enum AccessError {
    /// Principal lacks Read on the graph or on a specific triple
    #[error("Read denied on <{graph}>{}", fmt_triple(.triple))]
    ReadDenied {
        /// Graph the principal attempted to read
        graph: String,
        /// Offending triple, when the denial is triple-level
        triple: Option<Triple>,
    },

    /// Principal lacks Update on the graph
    #[error("Update denied on <{graph}>")]
    UpdateDenied {
        /// Graph the principal attempted to update
        graph: String,
    },

    /// Principal lacks Create on a specific triple
    #[error("Add denied on <{graph}>: {triple}")]
    AddDenied {
        /// Graph the principal attempted to add to
        graph: String,
        /// Triple the principal may not create
        triple: Triple,
    },

    /// Principal lacks Delete on a specific triple
    #[error("Delete denied on <{graph}>: {triple}")]
    DeleteDenied {
        /// Graph the principal attempted to delete from
        graph: String,
        /// Triple the principal may not delete
        triple: Triple,
    },

    /// The evaluator requires authentication and the principal is anonymous
    #[error("Authentication required")]
    AuthenticationRequired,

    /// No statement matched a required-property lookup
    #[error("Property not found: {subject} {predicate}")]
    PropertyNotFound {
        /// Subject of the lookup
        subject: Node,
        /// Predicate of the lookup
        predicate: Node,
    },

    /// Error from the underlying graph, propagated unchanged
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl AccessError {
    /// Create a graph-level read denial
    pub fn read_denied(graph: impl Into<String>) -> Self {
        AccessError::ReadDenied {
            graph: graph.into(),
            triple: None,
        }
    }

    /// Create a triple-level read denial
    pub fn read_denied_triple(graph: impl Into<String>, triple: Triple) -> Self {
        AccessError::ReadDenied {
            graph: graph.into(),
            triple: Some(triple),
        }
    }

    /// Create an update denial
    pub fn update_denied(graph: impl Into<String>) -> Self {
        AccessError::UpdateDenied {
            graph: graph.into(),
        }
    }

    /// Create an add (create) denial
    pub fn add_denied(graph: impl Into<String>, triple: Triple) -> Self {
        AccessError::AddDenied {
            graph: graph.into(),
            triple,
        }
    }

    /// Create a delete denial
    pub fn delete_denied(graph: impl Into<String>, triple: Triple) -> Self {
        AccessError::DeleteDenied {
            graph: graph.into(),
            triple,
        }
    }

    /// Create a property-not-found error
    pub fn property_not_found(subject: Node, predicate: Node) -> Self {
        AccessError::PropertyNotFound { subject, predicate }
    }

    /// True for the four denial variants and authentication failure
    ///
    /// Lets callers catch every access refusal uniformly without matching
    /// each variant.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AccessError::ReadDenied { .. }
                | AccessError::UpdateDenied { .. }
                | AccessError::AddDenied { .. }
                | AccessError::DeleteDenied { .. }
                | AccessError::AuthenticationRequired
        )
    }

    /// The offending triple attached to this denial, if any
    pub fn triple(&self) -> Option<&Triple> {
        match self {
            AccessError::ReadDenied { triple, .. } => triple.as_ref(),
            AccessError::AddDenied { triple, .. } => Some(triple),
            AccessError::DeleteDenied { triple, .. } => Some(triple),
            _ => None,
        }
    }
}

fn fmt_triple(t: &Option<Triple>) -> String {
    match t {
        Some(t) => format!(": {t}"),
        None => String::new(),
    }
}
