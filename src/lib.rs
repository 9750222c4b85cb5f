//! Deferred Computation Tracer
//!
//! A small, single-threaded tracer that turns ordinary function calls into a lazily evaluated
//! computation graph, with memoized realization.
//!
//! # Features
//!
//! - **Transparent adaptation**: [`make_traceable`] wraps a function or a stateful object so
//!   that the same call site either runs immediately or records a graph node, depending only
//!   on whether a [`Tracer`] is active.
//! - **Lazy, memoized evaluation**: a recorded [`Node`] runs nothing until
//!   [`Node::realize`], and each operation runs at most once per node.
//! - **Scoped, nestable tracing**: [`Tracer::enter`] returns an RAII guard; leaving a scope
//!   (including by panic) restores whatever was active before.
//! - **Acyclic by construction**: nodes only reference nodes that already exist. See
//!   [`cycle_prevention`] for the proof.
//! - **Errors pass through**: a failing operation's error comes back from
//!   [`Node::realize`] unchanged, and nothing is cached for it.
//!
//! # Quick Start
//!
//! ```
//! use neet::{make_traceable, Function, Node, Tracer};
//!
//! let add = make_traceable(Function::new(|a: i64, b: i64| a + b).named("add"));
//! let mul = make_traceable(Function::new(|a: i64, b: i64| a * b).named("mul"));
//!
//! // No tracer: calls run immediately
//! assert_eq!(add.call((1i64, 2i64)).unwrap().value(), Some(&3));
//!
//! // Under a tracer: calls record nodes
//! let a = Node::constant(1i64, "a");
//! let b = Node::constant(2i64, "b");
//! let c = Node::constant(3i64, "c");
//!
//! let e = Tracer::new().scope(|| -> neet::OpResult<Node<i64>> {
//!     let sum = add.call((&a, &b))?;
//!     let product = mul.call((sum, &c))?;
//!     Ok(mul.call((product, &a))?.into_node())
//! })
//! .unwrap();
//!
//! assert!(!e.is_realized());
//! assert_eq!(e.realize().unwrap(), 9);
//! ```
//!
//! # Core Concepts
//!
//! ## Node
//!
//! A [`Node<T>`] is a vertex of the graph: either a constant leaf or an [`Operation`] applied
//! to input nodes. Nodes are shared handles; cloning one is cheap, and equality is identity.
//!
//! ## Tracer
//!
//! A [`Tracer`] marks a dynamic scope on the current thread. While one is active,
//! [`under_trace`] is `true` and adapted callables record instead of run. Tracers nest; the
//! innermost one wins and the previous one comes back when its guard drops.
//!
//! ## Adapted callables
//!
//! [`make_traceable`] accepts a [`Function`] or an `Rc<RefCell<O>>` where `O:` [`Invocable`],
//! and returns a [`TracedFn`] or a [`TracedObject`]. [`is_traceable`] tells adapted callables
//! from plain ones.
//!
//! Stateful objects implement [`Invocable`], most easily through the [`invocable`] attribute:
//!
//! ```
//! use neet::{invocable, TracedObject, Tracer};
//!
//! struct Accumulator {
//!     total: i64,
//! }
//!
//! #[invocable]
//! impl Accumulator {
//!     fn call(&mut self, x: i64) -> i64 {
//!         self.total += x;
//!         self.total
//!     }
//! }
//!
//! let acc = TracedObject::new(Accumulator { total: 0 });
//! let node = Tracer::new().scope(|| acc.call((5i64,)).unwrap().into_node());
//!
//! assert_eq!(acc.borrow().total, 0);
//! assert_eq!(node.realize().unwrap(), 5);
//! assert_eq!(acc.borrow().total, 5);
//! ```
//!
//! # Implementation Notes
//!
//! ## Threads
//!
//! Nodes, operations and tracers are `Rc`-based and stay on the thread that created them. The
//! active-tracer state is thread-local, so a tracer entered on one thread has no effect on
//! another.
//!
//! ## Argument Count
//!
//! Fixed-arity functions accept up to 6 arguments; call sites accept up to 8 as a tuple, and
//! any number through [`Args`] or a `Vec<Arg<T>>`. Use [`Function::variadic`] for operations
//! that take any number of arguments.
//!
//! # Tracing
//!
//! neet has optional logging support via the `tracing` crate. Enable the `tracing` feature:
//!
//! ```toml
//! [dependencies]
//! neet = { version = "0.1", features = ["tracing"] }
//! ```
//!
//! Then initialize a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("neet=debug")
//!     .init();
//! ```
//!
//! Log levels:
//! - **DEBUG**: tracer scopes entered and left, nodes recorded, operations invoked
//! - **TRACE**: constants wrapped, cache hits, untraced invocations
//! - **WARN**: tracer guards dropped out of order
//!
//! With the feature disabled, every logging call compiles away.

// Allow the crate to refer to itself as `neet` (needed by `#[invocable]` inside this crate)
extern crate self as neet;

mod adapter;
mod args;
pub mod cycle_prevention;
mod error;
mod node;
mod operation;
mod tracer;

pub use adapter::{
    is_traceable, make_traceable, Introspect, IntoTraceable, Strategy, Traced, TracedFn,
    TracedObject,
};
pub use args::{to_node, Arg, Args, IntoArgs};
pub use error::{OpError, OpResult, TraceError};
pub use node::Node;
pub use operation::{Function, IntoFallibleOperation, IntoOperation, Invocable, Metadata, Operation};
pub use tracer::{current, under_trace, TraceGuard, Tracer, TracerOptions};

// Re-export the procedural macro
pub use neet_macros::invocable;

// Used by code generated with `#[invocable]`
#[doc(hidden)]
pub mod __private {
    pub use crate::operation::take_args;
}
