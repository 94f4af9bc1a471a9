//! RDF terms
//!
//! A [`Node`] is a tagged variant over the four term kinds the graph layer
//! works with:
//! - `Iri`: an absolute IRI reference
//! - `Blank`: a blank node with a local label
//! - `Literal`: a lexical form with datatype and optional language tag
//! - `Any`: the wildcard used in find patterns; matches any concrete term
//!
//! Literals carry their canonical lexical form; [`Literal::boolean`],
//! [`Literal::integer`] and friends produce the canonical mapping for the
//! corresponding XSD datatype.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use warden_vocab::{rdf, xsd};

/// An RDF literal: lexical form, datatype IRI, optional language tag.
///
/// Language-tagged literals always have the `rdf:langString` datatype.
/// Equality is structural over all three fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The lexical form
    pub lexical: String,
    /// Datatype IRI
    pub datatype: String,
    /// Language tag, lowercase (only for rdf:langString literals)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Literal {
    /// Create a plain `xsd:string` literal
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: xsd::STRING.to_string(),
            lang: None,
        }
    }

    /// Create a language-tagged literal (`rdf:langString`)
    pub fn lang_string(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: rdf::LANG_STRING.to_string(),
            lang: Some(lang.into().to_ascii_lowercase()),
        }
    }

    /// Create a canonical `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: if value { "true" } else { "false" }.to_string(),
            datatype: xsd::BOOLEAN.to_string(),
            lang: None,
        }
    }

    /// Create a canonical `xsd:integer` literal
    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: xsd::INTEGER.to_string(),
            lang: None,
        }
    }

    /// Create a canonical `xsd:double` literal
    ///
    /// Uses the shortest round-trippable decimal form rather than the XSD
    /// exponent form; stores compare lexically, so canonicalization only has
    /// to be internally consistent.
    pub fn double(value: f64) -> Self {
        Self {
            lexical: format!("{value:?}"),
            datatype: xsd::DOUBLE.to_string(),
            lang: None,
        }
    }

    /// Create a literal with an explicit datatype IRI
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            lang: None,
        }
    }

    /// The language tag, or `None` for untagged literals
    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// True when the language tag matches `lang`
    ///
    /// An empty `lang` matches only untagged literals.
    pub fn matches_lang(&self, lang: &str) -> bool {
        match (&self.lang, lang.is_empty()) {
            (None, true) => true,
            (Some(tag), false) => tag.eq_ignore_ascii_case(lang),
            _ => false,
        }
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::string(v)
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::string(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::boolean(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::integer(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::double(v)
    }
}

/// An RDF term, or the find-pattern wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// An IRI reference
    Iri(String),
    /// A blank node with a local label
    Blank(String),
    /// A literal value
    Literal(Literal),
    /// Wildcard: matches any concrete node in find patterns
    Any,
}

impl Node {
    /// Create an IRI node
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    /// Create a blank node with the given label
    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(label.into())
    }

    /// Create a blank node with a fresh unique label
    pub fn new_blank() -> Self {
        Node::Blank(format!("b{}", Uuid::new_v4().simple()))
    }

    /// Create a literal node
    pub fn literal(lit: impl Into<Literal>) -> Self {
        Node::Literal(lit.into())
    }

    /// True for every variant except [`Node::Any`]
    pub fn is_concrete(&self) -> bool {
        !matches!(self, Node::Any)
    }

    /// True for IRI and blank nodes
    pub fn is_resource(&self) -> bool {
        matches!(self, Node::Iri(_) | Node::Blank(_))
    }

    /// True for blank nodes
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// True for literal nodes
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// The IRI string, if this is an IRI node
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this is a literal node
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// True when this pattern component accepts `other`
    ///
    /// `Any` accepts every concrete node; concrete nodes accept only
    /// themselves.
    pub fn accepts(&self, other: &Node) -> bool {
        matches!(self, Node::Any) || self == other
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(label) => write!(f, "_:{label}"),
            Node::Literal(lit) => {
                write!(f, "\"{}\"", lit.lexical)?;
                if let Some(lang) = &lit.lang {
                    write!(f, "@{lang}")
                } else if lit.datatype != xsd::STRING {
                    write!(f, "^^<{}>", lit.datatype)
                } else {
                    Ok(())
                }
            }
            Node::Any => write!(f, "ANY"),
        }
    }
}
