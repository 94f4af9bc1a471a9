//! Error types for warden-graph

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, GraphError>;

/// Base graph error type
#[derive(Error, Debug)]
pub enum GraphError {
    /// Operation attempted on a closed graph
    #[error("Graph is closed: {0}")]
    Closed(String),

    /// N-Triples parse error
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending input line
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Malformed RDF term (e.g. a literal in subject position)
    #[error("Invalid term: {0}")]
    Term(String),

    /// Operation not supported by this graph implementation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// I/O error from an underlying store
    #[error("I/O error: {0}")]
    Io(String),
}

impl GraphError {
    /// Create a closed-graph error
    pub fn closed(graph: impl Into<String>) -> Self {
        GraphError::Closed(graph.into())
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-term error
    pub fn term(msg: impl Into<String>) -> Self {
        GraphError::Term(msg.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        GraphError::Unsupported(msg.into())
    }

    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        GraphError::Io(msg.into())
    }
}
