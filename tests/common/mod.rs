// Common test utilities and helpers for the test suite

use std::cell::Cell;
use std::rc::Rc;

use neet::{make_traceable, Function, Metadata, Operation, TracedFn};

/// Traceable `add` over `i64`.
#[allow(dead_code)]
pub fn add() -> TracedFn<i64> {
    make_traceable(Function::new(|a: i64, b: i64| a + b).named("add"))
}

/// Traceable `mul` over `i64`.
#[allow(dead_code)]
pub fn mul() -> TracedFn<i64> {
    make_traceable(Function::new(|a: i64, b: i64| a * b).named("mul"))
}

/// Traceable `add` that counts how often it actually runs.
#[allow(dead_code)]
pub fn counting_add(calls: &Rc<Cell<usize>>) -> TracedFn<i64> {
    let calls = Rc::clone(calls);
    make_traceable(
        Function::new(move |a: i64, b: i64| {
            calls.set(calls.get() + 1);
            a + b
        })
        .named("add"),
    )
}

/// Raw operation that counts its invocations and sums its arguments.
#[allow(dead_code)]
pub fn counting_sum(name: &str, calls: &Rc<Cell<usize>>) -> Operation<i64> {
    let calls = Rc::clone(calls);
    Operation::new(Metadata::new(name), move |args: Vec<i64>| {
        calls.set(calls.get() + 1);
        Ok(args.iter().sum())
    })
}

#[allow(dead_code)]
pub mod objects {
    use neet::invocable;

    /// Running total of everything it has been called with
    pub struct Accumulator {
        pub total: i64,
        pub calls: usize,
    }

    impl Accumulator {
        pub fn new() -> Self {
            Self { total: 0, calls: 0 }
        }
    }

    #[invocable]
    impl Accumulator {
        /// Add `x` to the running total and return the new total.
        fn call(&mut self, x: i64) -> i64 {
            self.calls += 1;
            self.total += x;
            self.total
        }
    }

    /// Multiplies by a fixed factor
    pub struct Scale(pub i64);

    #[invocable(name = "scale")]
    impl Scale {
        fn call(&self, x: i64) -> i64 {
            x * self.0
        }
    }

    /// Integer division that refuses to divide by zero
    pub struct Divide;

    #[invocable]
    impl Divide {
        fn call(a: i64, b: i64) -> Result<i64, String> {
            a.checked_div(b).ok_or_else(|| format!("cannot divide {} by zero", a))
        }
    }
}
