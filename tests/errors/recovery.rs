//! Failed realizations leave nothing behind and can be retried

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use neet::{make_traceable, Function, TraceError, TracedObject, Tracer};

use crate::common::objects::Accumulator;

#[test]
fn test_retry_after_transient_failure() {
    let available = Rc::new(Cell::new(false));
    let calls = Rc::new(Cell::new(0));

    let gate = {
        let available = Rc::clone(&available);
        let calls = Rc::clone(&calls);
        make_traceable(
            Function::try_new(move |x: i64| {
                calls.set(calls.get() + 1);
                if available.get() {
                    Ok(x * 2)
                } else {
                    Err("resource unavailable")
                }
            })
            .named("gate"),
        )
    };

    let node = Tracer::new().scope(|| gate.call((21i64,)).unwrap().into_node());

    assert!(node.realize().is_err());
    assert!(!node.is_realized());

    available.set(true);
    assert_eq!(node.realize().unwrap(), 42);
    assert_eq!(node.realize().unwrap(), 42);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_reentrant_object_invocation_is_an_error() {
    let acc = TracedObject::new(Accumulator::new());
    let pending = Tracer::new().scope(|| acc.call((1i64,)).unwrap().into_node());

    // Realizing while the object is borrowed elsewhere
    let held = acc.borrow_mut();
    let err = pending.realize().unwrap_err();
    drop(held);

    assert_eq!(
        err.downcast_ref::<TraceError>(),
        Some(&TraceError::ReentrantInvocation {
            operation: "Accumulator".to_string(),
        })
    );

    // Once released, the same node realizes normally
    assert_eq!(pending.realize().unwrap(), 1);
    assert_eq!(acc.borrow().total, 1);
}

#[test]
fn test_failure_does_not_touch_object_state() {
    let acc = Rc::new(RefCell::new(Accumulator::new()));
    let traced = make_traceable(Rc::clone(&acc));

    // Wrong arity is rejected before the object runs
    assert!(traced.call((1i64, 2i64)).is_err());
    assert_eq!(acc.borrow().calls, 0);
}
