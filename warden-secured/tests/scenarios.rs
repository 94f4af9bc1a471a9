//! End-to-end enforcement scenarios across the secured façade.

use std::sync::{Arc, Mutex};
use warden_graph::{Graph, GraphListener, MemGraph, Model, Node, Statement, Triple};
use warden_secured::{
    AccessError, Action, Principal, SecuredModel, StaticEvaluator,
};

fn iri(s: &str) -> Node {
    Node::iri(format!("http://e/{s}"))
}

fn stmt(s: &str, p: &str, o: &str) -> Statement {
    Statement::new(iri(s), iri(p), iri(o)).unwrap()
}

fn base_with(triples: &[Statement]) -> Arc<dyn Graph> {
    let g = MemGraph::new("http://e/g");
    for s in triples {
        g.add(s.as_triple().clone()).unwrap();
    }
    Arc::new(g)
}

/// Base contains three triples; only T1 is readable. size() sees one triple
/// and the graph does not look empty.
#[test]
fn read_restricted_size_counts_only_readable() {
    let base = base_with(&[stmt("s", "p", "t1"), stmt("s", "p", "t2"), stmt("s", "p", "t3")]);
    let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
        |_, _, t| t.o == Node::iri("http://e/t1"),
    ));
    let m = SecuredModel::new(e, base);

    assert_eq!(m.size().unwrap(), 1);
    assert!(!m.is_empty().unwrap());
    assert!(m.contains(&stmt("s", "p", "t1")).unwrap());
    assert!(!m.contains(&stmt("s", "p", "t2")).unwrap());
}

/// Hard-read evaluator denying graph Read: size() raises instead of lying.
#[test]
fn hard_read_denial_raises() {
    let base = base_with(&[stmt("s", "p", "o")]);
    let e = Arc::new(
        StaticEvaluator::new(Principal::named("alice"), [Action::Update]).with_hard_read(true),
    );
    let m = SecuredModel::new(e, base);

    assert!(matches!(m.size(), Err(AccessError::ReadDenied { .. })));
    assert!(matches!(m.is_empty(), Err(AccessError::ReadDenied { .. })));
}

/// Bulk add where one element is uncreatable: the base stays empty and the
/// denial names the offending triple.
#[test]
fn bulk_add_rolls_back_nothing_applied() {
    let base = base_with(&[]);
    let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
        |_, action, t| !(action == Action::Create && t.o == Node::iri("http://e/t2")),
    ));
    let m = SecuredModel::new(e, Arc::clone(&base));

    let batch = vec![stmt("s", "p", "t1"), stmt("s", "p", "t2"), stmt("s", "p", "t3")];
    match m.add_all(&batch).unwrap_err() {
        AccessError::AddDenied { triple, .. } => {
            assert_eq!(triple, stmt("s", "p", "t2").into_triple());
        }
        other => panic!("expected AddDenied, got {other:?}"),
    }
    assert_eq!(base.size().unwrap(), 0);
}

/// A reification with one unreadable constituent triple is invisible.
#[test]
fn reification_hidden_when_quad_incomplete() {
    let base = base_with(&[]);
    let plain = Model::new(Arc::clone(&base));
    let target = stmt("s", "p", "o");
    plain.reify(Some("http://e/r1"), &target).unwrap();

    let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
        |_, _, t| {
            t.is_concrete()
                && !(t.s == Node::iri("http://e/r1")
                    && t.p == Node::iri(warden_vocab::rdf::OBJECT))
        },
    ));
    let m = SecuredModel::new(e, base);

    assert!(!m.is_reified(&target).unwrap());
    assert!(m.list_reified_statements_of(&target).unwrap().is_empty());
}

/// A listener whose principal may not read the added triple receives no
/// notification.
#[test]
fn listener_never_sees_forbidden_triple() {
    #[derive(Default)]
    struct Recorder(Mutex<Vec<Triple>>);
    impl GraphListener for Recorder {
        fn triple_added(&self, _g: &str, t: &Triple) {
            self.0.lock().unwrap().push(t.clone());
        }
        fn triple_deleted(&self, _g: &str, _t: &Triple) {}
    }

    let base = base_with(&[]);
    let e = Arc::new(StaticEvaluator::allow_all(Principal::named("bob")).with_triple_rule(
        |_, _, t| t.o != Node::iri("http://e/secret"),
    ));
    let m = SecuredModel::new(e, Arc::clone(&base));

    let rec = Arc::new(Recorder::default());
    m.event_manager().register(rec.clone()).unwrap();

    base.add(stmt("s", "p", "secret").into_triple()).unwrap();
    base.add(stmt("s", "p", "public").into_triple()).unwrap();

    let seen = rec.0.lock().unwrap().clone();
    assert_eq!(seen, vec![stmt("s", "p", "public").into_triple()]);
}

/// Required-property lookup on an absent, unreadable pattern reveals nothing:
/// the caller gets ReadDenied, not PropertyNotFound.
#[test]
fn required_property_absence_does_not_leak() {
    let base = base_with(&[]);
    let e = Arc::new(StaticEvaluator::allow_all(Principal::named("alice")).with_triple_rule(
        |_, _, t| t.p != Node::iri("http://e/p"),
    ));
    let m = SecuredModel::new(e, base);

    assert!(matches!(
        m.get_required_property(&iri("s"), &iri("p")),
        Err(AccessError::ReadDenied { .. })
    ));
}

/// Unauthenticated principals fail before any authorization outcome when the
/// evaluator demands authentication.
#[test]
fn authentication_gate_applies_everywhere() {
    let base = base_with(&[stmt("s", "p", "o")]);
    let e = Arc::new(
        StaticEvaluator::allow_all(Principal::Anonymous).with_required_authentication(true),
    );
    let m = SecuredModel::new(e.clone(), base);

    assert!(matches!(m.size(), Err(AccessError::AuthenticationRequired)));
    assert!(matches!(
        m.add(&stmt("s", "p", "o2")),
        Err(AccessError::AuthenticationRequired)
    ));
    assert!(matches!(
        m.event_manager().register(Arc::new(Noop)).map(|_| ()),
        Err(AccessError::AuthenticationRequired)
    ));

    e.set_principal(Principal::named("alice"));
    assert_eq!(m.size().unwrap(), 1);
}

struct Noop;
impl GraphListener for Noop {
    fn triple_added(&self, _g: &str, _t: &Triple) {}
    fn triple_deleted(&self, _g: &str, _t: &Triple) {}
}
