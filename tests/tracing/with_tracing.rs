//! Tests with tracing feature enabled

use neet::{Node, Tracer};

use tracing_subscriber::{fmt, EnvFilter};

use crate::common::objects::Accumulator;
use crate::common::{add, mul};

fn init_subscriber() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_tracing_with_subscriber() {
    init_subscriber();

    let add = add();
    let a = Node::constant(2i64, "a");

    let sum = Tracer::new().scope(|| add.call((&a, 3i64)).unwrap().into_node());

    assert_eq!(sum.realize().unwrap(), 5);
    // Cache hit path
    assert_eq!(sum.realize().unwrap(), 5);
}

#[test]
fn test_tracing_with_nested_scopes_and_objects() {
    init_subscriber();

    let add = add();
    let mul = mul();
    let acc = neet::TracedObject::new(Accumulator::new());

    let outer = Tracer::new();
    let node = outer.scope(|| {
        let inner = Tracer::imperative().scope(|| add.call((1i64, 2i64)).unwrap());
        let scaled = mul.call((inner, 10i64)).unwrap();
        acc.call((scaled,)).unwrap().into_node()
    });

    // Immediate call logs at trace level
    assert_eq!(add.call((1i64, 1i64)).unwrap().value(), Some(&2));

    assert_eq!(node.realize().unwrap(), 30);
}

#[test]
fn test_tracing_out_of_order_guard_drop() {
    init_subscriber();

    let base = Tracer::new();
    let _base_guard = base.enter();

    let first = Tracer::new();
    let second = Tracer::new();
    let first_guard = first.enter();
    let second_guard = second.enter();

    // Logs a warning, still restores
    drop(first_guard);
    assert_eq!(neet::current(), Some(base.clone()));
    drop(second_guard);
    assert_eq!(neet::current(), Some(first.clone()));
}
