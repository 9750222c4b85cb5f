//! Adapted functions

use neet::{is_traceable, make_traceable, Arg, Args, Function, Introspect, Node, Tracer};
use test_case::test_case;

/// Add two numbers.
fn add(a: i64, b: i64) -> i64 {
    a + b
}

fn clamp(x: i64, lo: i64, hi: i64) -> i64 {
    x.max(lo).min(hi)
}

#[test]
fn test_name_and_doc_survive_adaptation() {
    let traced = make_traceable(Function::new(add).with_doc("Add two numbers."));

    assert_eq!(traced.name(), "add");
    assert_eq!(traced.doc(), Some("Add two numbers."));
    assert_eq!(Introspect::name(&traced), "add");
}

#[test]
fn test_marker_only_on_adapted_form() {
    let plain = Function::new(add);
    let traced = make_traceable(plain.clone());

    assert!(is_traceable(&traced));
    assert!(!is_traceable(&plain));
    // Adapting does not alter the original
    assert_eq!(plain.call(vec![1, 2]).unwrap(), 3);
}

#[test]
fn test_recorded_node_labelled_by_function_name() {
    let traced = make_traceable(Function::new(clamp));

    let node = Tracer::new().scope(|| traced.call((15i64, 0i64, 10i64)).unwrap().into_node());

    assert_eq!(node.label(), Some("clamp"));
    assert_eq!(node.operation().map(|op| op.name()), Some("clamp"));
    assert_eq!(node.realize().unwrap(), 10);
}

#[test]
fn test_wrapped_arguments_are_labelled() {
    let traced = make_traceable(Function::new(clamp));
    let x = Node::constant(-4i64, "x");

    let node = Tracer::new().scope(|| {
        let args = Args::<i64>::new().arg(&x).kwarg("lo", 0i64).kwarg("hi", 10i64);
        traced.call(args).unwrap().into_node()
    });

    let labels: Vec<_> = node.inputs().iter().map(|n| n.label()).collect();
    assert_eq!(labels, vec![Some("x"), Some("lo"), Some("hi")]);
    assert!(node.inputs()[0].ptr_eq(&x));
    assert_eq!(node.realize().unwrap(), 0);
}

#[test_case(vec![] => 0 ; "no arguments")]
#[test_case(vec![5] => 5 ; "one argument")]
#[test_case(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10] => 55 ; "ten arguments")]
fn test_variadic_function(values: Vec<i64>) -> i64 {
    let sum = make_traceable(Function::variadic("sum", |xs: Vec<i64>| Ok(xs.iter().sum())));
    let args: Vec<Arg<i64>> = values.into_iter().map(Arg::Value).collect();

    let node = Tracer::new().scope(|| sum.call(args).unwrap().into_node());
    node.realize().unwrap()
}

#[test]
fn test_string_values() {
    let greet = make_traceable(
        Function::new(|greeting: String, name: String| format!("{}, {}!", greeting, name))
            .named("greet"),
    );

    let node = Tracer::new().scope(|| {
        greet
            .call((String::from("Hello"), Node::constant(String::from("world"), "name")))
            .unwrap()
            .into_node()
    });

    assert_eq!(node.inputs()[0].label(), Some("String"));
    assert_eq!(node.realize().unwrap(), "Hello, world!");
}
