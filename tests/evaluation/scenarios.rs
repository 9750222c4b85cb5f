//! End-to-end scenarios mixing immediate and deferred calls

use std::cell::RefCell;
use std::rc::Rc;

use neet::{make_traceable, Node, OpResult, Tracer};
use test_case::test_case;

use crate::common::objects::Accumulator;
use crate::common::{add, mul};

/// `e = mul(mul(add(a, b), c), a)` with `c = 3`
fn trace_expression(a: &Node<i64>, b: &Node<i64>) -> OpResult<Node<i64>> {
    let add = add();
    let mul = mul();
    let c = Node::constant(3i64, "c");

    let _guard = Tracer::new().enter();
    let sum = add.call((a, b))?;
    let product = mul.call((sum, &c))?;
    Ok(mul.call((product, a))?.into_node())
}

#[test_case(1, 2, 9 ; "small inputs")]
#[test_case(2, 3, 50 ; "larger inputs")]
#[test_case(0, 7, 0 ; "zero input")]
#[test_case(-1, 1, 0 ; "negative input")]
fn test_add_mul_expression(a: i64, b: i64, expected: i64) {
    let a = Node::constant(a, "a");
    let b = Node::constant(b, "b");

    let e = trace_expression(&a, &b).unwrap();

    assert_eq!(e.label(), Some("mul"));
    assert_eq!(e.realize().unwrap(), expected);
}

#[test]
fn test_untraced_calls_match_direct_evaluation() {
    let add = add();
    let mul = mul();

    for a in -3i64..=3 {
        for b in -3i64..=3 {
            let sum = add.call((a, b)).unwrap();
            let product = mul.call((sum, 3i64)).unwrap();
            let e = mul.call((product, a)).unwrap();
            assert_eq!(e.value(), Some(&((a + b) * 3 * a)));
        }
    }
}

#[test]
fn test_second_factor_as_fresh_node() {
    let add = add();
    let mul = mul();
    let a = Node::constant(1i64, "a");
    let b = Node::constant(2i64, "b");
    let c = Node::constant(3i64, "c");

    let e = Tracer::new().scope(|| {
        let d = mul.call((add.call((&a, &b)).unwrap(), &c)).unwrap();
        mul.call((d, Node::new(1i64))).unwrap().into_node()
    });

    assert_eq!(e.realize().unwrap(), 9);
    assert!(!e.inputs()[1].ptr_eq(&a));
}

#[test]
fn test_accumulator_three_calls_one_realized() {
    let acc = make_traceable(Rc::new(RefCell::new(Accumulator::new())));

    // Immediate call
    assert_eq!(acc.call((10i64,)).unwrap().value(), Some(&10));
    assert_eq!(acc.borrow().total, 10);

    // Two traced calls, only one of them realized
    let (realized, _ignored) = Tracer::new().scope(|| {
        let realized = acc.call((5i64,)).unwrap().into_node();
        let ignored = acc.call((100i64,)).unwrap().into_node();
        (realized, ignored)
    });
    assert_eq!(acc.borrow().total, 10);

    assert_eq!(realized.realize().unwrap(), 15);
    assert_eq!(realized.realize().unwrap(), 15);

    let state = acc.borrow();
    assert_eq!(state.total, 15);
    assert_eq!(state.calls, 2);
}

#[test]
fn test_rendered_expression() {
    let a = Node::constant(1i64, "a");
    let b = Node::constant(2i64, "b");

    let e = trace_expression(&a, &b).unwrap();
    e.realize().unwrap();

    let expected = "\
mul = 9
  mul = 9
    add = 3
      a = 1
      b = 2
    c = 3
  a = 1
";
    assert_eq!(e.render(), expected);
}
