//! # Tracing Example
//!
//! This example shows how to use the optional tracing feature to see when calls are recorded,
//! when nodes are realized and when the cache answers instead.
//!
//! ## Running This Example
//!
//! ```bash
//! # With default log level (debug)
//! cargo run --example tracing_example --features tracing
//!
//! # With trace level (adds cache hits and wrapped constants)
//! RUST_LOG=neet=trace cargo run --example tracing_example --features tracing
//! ```
//!
//! ## Log Levels
//!
//! - **DEBUG**: trace scopes entered and left, nodes recorded, operations invoked
//! - **TRACE**: constants wrapped, cache hits, untraced invocations
//! - **WARN**: trace scopes exited out of order

use neet::{make_traceable, Function, Node, OpResult, Tracer};

use tracing_subscriber::{fmt, EnvFilter};

fn main() -> OpResult<()> {
    // Use RUST_LOG environment variable to control log level
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("neet=debug")),
        )
        .init();

    let add = make_traceable(Function::new(|a: i64, b: i64| a + b).named("add"));
    let mul = make_traceable(Function::new(|a: i64, b: i64| a * b).named("mul"));

    println!("=== Deferred Evaluation with Tracing ===\n");

    // Example 1: Immediate calls
    println!("Example 1: No Tracer");
    println!("--------------------");
    {
        let sum = add.call((2i64, 3i64))?;
        println!("\nResult: {:?}\n", sum.value());
    }

    // Example 2: Diamond pattern, recorded then realized
    println!("\nExample 2: Diamond Pattern");
    println!("--------------------------");
    {
        let source = Node::constant(10i64, "source");

        let sink = Tracer::new().scope(|| -> OpResult<Node<i64>> {
            let left = add.call((&source, &source))?;
            let right = mul.call((&source, &source))?;
            Ok(add.call((left, right))?.into_node())
        })?;

        println!("\nRecorded:\n{}", sink);
        println!("Result: {}", sink.realize()?);
        println!("(Expected: 10+10 = 20, 10*10 = 100, 20+100 = 120)\n");

        // Second realization is served from the cache
        sink.realize()?;
        println!("Realized:\n{}", sink);
    }

    // Example 3: Nested scopes
    println!("\nExample 3: Nested Scopes");
    println!("------------------------");
    {
        let outer = Tracer::new();
        let _outer = outer.enter();

        let inner = Tracer::new().scope(|| add.call((1i64, 2i64)))?;
        let total = mul.call((inner, 4i64))?.into_node();

        println!("\nResult: {}", total.realize()?);
        println!("(Expected: (1+2)*4 = 12)\n");
    }

    println!("\n=== Tracing Example Complete ===");
    Ok(())
}
