//! N-Triples reading and writing
//!
//! One triple per line, absolute IRIs, standard string escapes. This is the
//! syntax the model layer delegates to for `read`/`write`; richer syntaxes
//! live outside this crate.

use crate::error::{GraphError, Result};
use crate::node::{Literal, Node};
use crate::triple::Triple;
use std::fmt::Write as _;
use warden_vocab::{rdf, xsd};

/// Serialize one term in N-Triples form
pub fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Iri(iri) => {
            let _ = write!(out, "<{iri}>");
        }
        Node::Blank(label) => {
            let _ = write!(out, "_:{label}");
        }
        Node::Literal(lit) => {
            out.push('"');
            escape_into(out, &lit.lexical);
            out.push('"');
            if let Some(lang) = &lit.lang {
                let _ = write!(out, "@{lang}");
            } else if lit.datatype != xsd::STRING {
                let _ = write!(out, "^^<{}>", lit.datatype);
            }
        }
        // Wildcards never appear in serialized data
        Node::Any => out.push_str("<urn:x-warden:any>"),
    }
}

/// Serialize one triple as a terminated N-Triples line
pub fn write_triple(out: &mut String, triple: &Triple) {
    write_node(out, &triple.s);
    out.push(' ');
    write_node(out, &triple.p);
    out.push(' ');
    write_node(out, &triple.o);
    out.push_str(" .\n");
}

/// Serialize a sequence of triples as an N-Triples document
pub fn write_document<'a>(triples: impl Iterator<Item = &'a Triple>) -> String {
    let mut out = String::new();
    for t in triples {
        write_triple(&mut out, t);
    }
    out
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

/// Parse an N-Triples document
///
/// Blank lines and `#` comment lines are skipped. Errors carry the 1-based
/// line number.
pub fn parse_document(input: &str) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        triples.push(parse_line(line, line_no)?);
    }
    Ok(triples)
}

fn parse_line(line: &str, line_no: usize) -> Result<Triple> {
    let mut cursor = Cursor {
        rest: line,
        line: line_no,
    };
    let s = cursor.term()?;
    if !s.is_resource() {
        return Err(GraphError::parse(line_no, "subject must be an IRI or blank node"));
    }
    let p = cursor.term()?;
    if p.as_iri().is_none() {
        return Err(GraphError::parse(line_no, "predicate must be an IRI"));
    }
    let o = cursor.term()?;
    cursor.end()?;
    Ok(Triple::new(s, p, o))
}

struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn err(&self, msg: impl Into<String>) -> GraphError {
        GraphError::parse(self.line, msg)
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn term(&mut self) -> Result<Node> {
        self.skip_ws();
        match self.rest.as_bytes().first() {
            Some(b'<') => self.iri(),
            Some(b'_') => self.blank(),
            Some(b'"') => self.literal(),
            _ => Err(self.err("expected IRI, blank node, or literal")),
        }
    }

    fn iri(&mut self) -> Result<Node> {
        let end = self
            .rest
            .find('>')
            .ok_or_else(|| self.err("unterminated IRI"))?;
        let iri = &self.rest[1..end];
        if iri.is_empty() {
            return Err(self.err("empty IRI"));
        }
        self.rest = &self.rest[end + 1..];
        Ok(Node::iri(iri))
    }

    fn blank(&mut self) -> Result<Node> {
        let body = self
            .rest
            .strip_prefix("_:")
            .ok_or_else(|| self.err("malformed blank node"))?;
        let end = body
            .find(|c: char| c.is_whitespace())
            .unwrap_or(body.len());
        if end == 0 {
            return Err(self.err("empty blank node label"));
        }
        let label = &body[..end];
        self.rest = &body[end..];
        Ok(Node::blank(label))
    }

    fn literal(&mut self) -> Result<Node> {
        let mut lexical = String::new();
        let mut chars = self.rest[1..].char_indices();
        let mut consumed = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    consumed = Some(i + 2); // opening quote + body + closing quote
                    break;
                }
                '\\' => {
                    let (_, esc) = chars
                        .next()
                        .ok_or_else(|| self.err("dangling escape in literal"))?;
                    match esc {
                        '"' => lexical.push('"'),
                        '\\' => lexical.push('\\'),
                        'n' => lexical.push('\n'),
                        'r' => lexical.push('\r'),
                        't' => lexical.push('\t'),
                        'u' | 'U' => {
                            let len = if esc == 'u' { 4 } else { 8 };
                            let mut hex = String::with_capacity(len);
                            for _ in 0..len {
                                let (_, h) = chars
                                    .next()
                                    .ok_or_else(|| self.err("truncated unicode escape"))?;
                                hex.push(h);
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .map_err(|_| self.err("invalid unicode escape"))?;
                            let ch = char::from_u32(code)
                                .ok_or_else(|| self.err("invalid unicode code point"))?;
                            lexical.push(ch);
                        }
                        other => {
                            return Err(self.err(format!("unknown escape \\{other}")));
                        }
                    }
                }
                c => lexical.push(c),
            }
        }
        let consumed = consumed.ok_or_else(|| self.err("unterminated literal"))?;
        self.rest = &self.rest[consumed..];

        if let Some(stripped) = self.rest.strip_prefix('@') {
            let end = stripped
                .find(|c: char| c.is_whitespace())
                .unwrap_or(stripped.len());
            if end == 0 {
                return Err(self.err("empty language tag"));
            }
            let lang = &stripped[..end];
            self.rest = &stripped[end..];
            return Ok(Node::literal(Literal::lang_string(lexical, lang)));
        }
        if let Some(stripped) = self.rest.strip_prefix("^^") {
            self.rest = stripped;
            let dt = self.term()?;
            let Some(dt_iri) = dt.as_iri() else {
                return Err(self.err("datatype must be an IRI"));
            };
            if dt_iri == rdf::LANG_STRING {
                return Err(self.err("rdf:langString literal requires a language tag"));
            }
            return Ok(Node::literal(Literal::typed(lexical, dt_iri)));
        }
        Ok(Node::literal(Literal::string(lexical)))
    }

    fn end(&mut self) -> Result<()> {
        self.skip_ws();
        match self.rest.strip_prefix('.') {
            Some(rest) if rest.trim().is_empty() => Ok(()),
            _ => Err(self.err("expected terminating '.'")),
        }
    }
}
