//! Adapted objects

use std::cell::RefCell;
use std::rc::Rc;

use neet::{is_traceable, make_traceable, Introspect, Strategy, TracedObject, Tracer};

use crate::common::objects::{Accumulator, Divide, Scale};

#[test]
fn test_object_identity_is_preserved() {
    let shared = Rc::new(RefCell::new(Accumulator::new()));
    let traced = make_traceable(Rc::clone(&shared));

    assert!(Rc::ptr_eq(traced.shared(), &shared));

    traced.call((3i64,)).unwrap();
    // Every handle sees the same state
    assert_eq!(shared.borrow().total, 3);
    assert_eq!(traced.borrow().total, 3);
}

#[test]
fn test_object_members_stay_reachable() {
    let acc = TracedObject::new(Accumulator::new());

    acc.borrow_mut().total = 40;
    assert_eq!(acc.call((2i64,)).unwrap().value(), Some(&42));
    assert_eq!(acc.borrow().calls, 1);
}

#[test]
fn test_object_metadata() {
    let acc = TracedObject::new(Accumulator::new());
    let scale = TracedObject::new(Scale(3));

    assert_eq!(acc.name(), "Accumulator");
    assert_eq!(
        acc.doc(),
        Some("Add `x` to the running total and return the new total.")
    );
    assert_eq!(scale.name(), "scale");
    assert_eq!(scale.doc(), None);
    assert_eq!(acc.invocation().strategy(), Strategy::Object);
}

#[test]
fn test_marker_lives_on_invocation() {
    let shared = Rc::new(RefCell::new(Scale(2)));
    assert!(!is_traceable(&shared));

    let traced = make_traceable(Rc::clone(&shared));
    assert!(is_traceable(&traced));
    assert!(is_traceable(traced.invocation()));
    assert!(!is_traceable(traced.shared()));
    assert_eq!(Introspect::name(traced.shared()), "scale");
}

#[test]
fn test_recorded_object_node() {
    let scale = TracedObject::new(Scale(3));

    let node = Tracer::new().scope(|| scale.call((7i64,)).unwrap().into_node());

    assert_eq!(node.label(), Some("scale"));
    assert_eq!(node.realize().unwrap(), 21);
}

#[test]
fn test_stateless_fallible_object() {
    let divide = TracedObject::new(Divide);

    assert_eq!(divide.call((9i64, 3i64)).unwrap().value(), Some(&3));

    let err = divide.call((9i64, 0i64)).unwrap_err();
    assert_eq!(err.to_string(), "cannot divide 9 by zero");
}

#[test]
fn test_clones_share_the_object() {
    let acc = TracedObject::new(Accumulator::new());
    let other = acc.clone();

    acc.call((1i64,)).unwrap();
    other.call((1i64,)).unwrap();

    assert_eq!(acc.borrow().total, 2);
    assert!(Rc::ptr_eq(acc.shared(), other.shared()));
}
