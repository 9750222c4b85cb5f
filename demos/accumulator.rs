//! # Stateful Objects
//!
//! An accumulator adapted with `make_traceable`: called directly it updates its total at once,
//! called under a tracer it only records, and the total changes when (and if) the recorded
//! node is realized.
//!
//! ```bash
//! cargo run --example accumulator
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use neet::{invocable, is_traceable, make_traceable, OpResult, Tracer};

struct Accumulator {
    total: i64,
}

#[invocable]
impl Accumulator {
    /// Add `x` to the running total and return the new total.
    fn call(&mut self, x: i64) -> i64 {
        self.total += x;
        self.total
    }
}

fn main() -> OpResult<()> {
    let shared = Rc::new(RefCell::new(Accumulator { total: 0 }));
    let acc = make_traceable(Rc::clone(&shared));

    println!("traceable: {}", is_traceable(&acc));
    println!("name: {}", acc.name());
    println!("doc: {}", acc.doc().unwrap_or("-"));

    let now = acc.call((10i64,))?;
    println!(
        "\nimmediate call -> {:?}, total = {}",
        now.value(),
        shared.borrow().total
    );

    let (kept, skipped) = Tracer::new().scope(|| -> OpResult<_> {
        let kept = acc.call((5i64,))?.into_node();
        let skipped = acc.call((100i64,))?.into_node();
        Ok((kept, skipped))
    })?;
    println!("two recorded calls, total = {}", shared.borrow().total);

    println!("realized -> {}", kept.realize()?);
    println!(
        "total = {} (the other call is still pending: {})",
        shared.borrow().total,
        !skipped.is_realized()
    );

    Ok(())
}
