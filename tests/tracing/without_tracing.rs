//! Tests that the library works correctly without tracing feature

use neet::{Node, Tracer};

use crate::common::{add, mul};

#[test]
fn test_basic_graph_without_tracing() {
    let add = add();
    let a = Node::constant(2i64, "a");
    let b = Node::constant(3i64, "b");

    let sum = Tracer::new().scope(|| add.call((&a, &b)).unwrap().into_node());

    assert_eq!(sum.realize().unwrap(), 5);
}

#[test]
fn test_complex_graph_without_tracing() {
    let add = add();
    let mul = mul();

    let sink = Tracer::new().scope(|| {
        let source = Node::constant(10i64, "source");
        let left = add.call((&source, &source)).unwrap();
        let right = mul.call((&source, &source)).unwrap();
        add.call((left, right)).unwrap().into_node()
    });

    // source = 10, left = 20, right = 100, sink = 120
    assert_eq!(sink.realize().unwrap(), 120);
}
