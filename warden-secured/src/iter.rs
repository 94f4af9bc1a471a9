//! Filtered triple iteration
//!
//! [`SecuredTripleIter`] wraps a base iterator and drops every triple the
//! bound principal may not read. The principal is captured at construction
//! time, so one iteration sees a single consistent projection even if the
//! ambient principal changes mid-walk.
//!
//! When the principal may read `Triple::ANY`, the base iterator passes
//! through without per-element checks. Dropping the iterator releases the
//! base iterator in every path, including mid-iteration abandonment.

use crate::checker::PermissionChecker;
use crate::evaluator::{Action, Principal};
use warden_graph::{Triple, TripleIter};

enum Mode {
    /// No filtering: the principal may read any triple
    PassThrough,
    /// Per-element read checks against the captured principal
    Filtered(Principal),
    /// Soft-mode graph read denial: yield nothing
    Empty,
}

/// Lazy sequence of readable triples.
pub struct SecuredTripleIter<'a> {
    checker: PermissionChecker,
    inner: Option<TripleIter<'a>>,
    mode: Mode,
}

impl<'a> SecuredTripleIter<'a> {
    /// Wrap `inner`, filtering per-element with the current principal
    pub(crate) fn filtered(
        checker: PermissionChecker,
        principal: Principal,
        inner: TripleIter<'a>,
    ) -> Self {
        Self {
            checker,
            inner: Some(inner),
            mode: Mode::Filtered(principal),
        }
    }

    /// Wrap `inner` without per-element checks
    pub(crate) fn pass_through(checker: PermissionChecker, inner: TripleIter<'a>) -> Self {
        Self {
            checker,
            inner: Some(inner),
            mode: Mode::PassThrough,
        }
    }

    /// An exhausted iterator (soft-mode read denial)
    pub(crate) fn empty(checker: PermissionChecker) -> Self {
        Self {
            checker,
            inner: None,
            mode: Mode::Empty,
        }
    }

    /// Release the underlying iterator without waiting for drop
    pub fn close(&mut self) {
        self.inner = None;
    }
}

impl Iterator for SecuredTripleIter<'_> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        let inner = self.inner.as_mut()?;
        match &self.mode {
            Mode::Empty => None,
            Mode::PassThrough => match inner.next() {
                Some(t) => Some(t),
                None => {
                    self.inner = None;
                    None
                }
            },
            Mode::Filtered(principal) => {
                for t in inner.by_ref() {
                    if self.checker.evaluator().evaluate_triple(
                        principal,
                        Action::Read,
                        self.checker.graph_iri(),
                        &t,
                    ) {
                        return Some(t);
                    }
                }
                self.inner = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{Principal, StaticEvaluator};
    use std::sync::Arc;
    use warden_graph::Node;

    fn t(o: &str) -> Triple {
        Triple::new(Node::iri("s"), Node::iri("p"), Node::iri(o))
    }

    fn triples() -> Vec<Triple> {
        vec![t("a"), t("secret"), t("b")]
    }

    #[test]
    fn test_filtered_drops_unreadable() {
        let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
            |_, _, triple| triple.o != Node::iri("secret"),
        ));
        let c = PermissionChecker::new(e, "http://e/g");
        let p = c.principal().unwrap();
        let iter =
            SecuredTripleIter::filtered(c, p, Box::new(triples().into_iter()));
        let seen: Vec<Triple> = iter.collect();
        assert_eq!(seen, vec![t("a"), t("b")]);
    }

    #[test]
    fn test_pass_through_yields_everything() {
        let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")));
        let c = PermissionChecker::new(e, "http://e/g");
        let iter = SecuredTripleIter::pass_through(c, Box::new(triples().into_iter()));
        assert_eq!(iter.count(), 3);
    }

    #[test]
    fn test_empty_yields_nothing() {
        let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")));
        let c = PermissionChecker::new(e, "http://e/g");
        let mut iter = SecuredTripleIter::empty(c);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_close_releases_base() {
        let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")));
        let c = PermissionChecker::new(e, "http://e/g");
        let mut iter = SecuredTripleIter::pass_through(c, Box::new(triples().into_iter()));
        assert!(iter.next().is_some());
        iter.close();
        assert_eq!(iter.next(), None);
    }
}
