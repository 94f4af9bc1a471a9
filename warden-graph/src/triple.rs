//! Triples and find patterns
//!
//! A [`Triple`] is an ordered (subject, predicate, object) of [`Node`]s.
//! A triple is *concrete* when no component is [`Node::Any`]; non-concrete
//! triples act as find patterns.

use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RDF triple, value-equal structurally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject node
    pub s: Node,
    /// Predicate node
    pub p: Node,
    /// Object node
    pub o: Node,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Node, p: Node, o: Node) -> Self {
        Self { s, p, o }
    }

    /// The all-wildcard pattern, matching every triple
    pub fn any() -> Self {
        Self {
            s: Node::Any,
            p: Node::Any,
            o: Node::Any,
        }
    }

    /// True when no component is a wildcard
    pub fn is_concrete(&self) -> bool {
        self.s.is_concrete() && self.p.is_concrete() && self.o.is_concrete()
    }

    /// True when every component is a wildcard
    pub fn is_any(&self) -> bool {
        !self.s.is_concrete() && !self.p.is_concrete() && !self.o.is_concrete()
    }

    /// True when this pattern accepts `other` component-wise
    pub fn matches(&self, other: &Triple) -> bool {
        self.s.accepts(&other.s) && self.p.accepts(&other.p) && self.o.accepts(&other.o)
    }

    /// True when any component is a blank node
    pub fn has_blank(&self) -> bool {
        self.s.is_blank() || self.p.is_blank() || self.o.is_blank()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.s, self.p, self.o)
    }
}
