//! # Acyclic by Construction
//!
//! This module documents why a recorded graph can never contain a cycle.
//! **Cycles are impossible via the public API**: there is nothing to detect at realization time.
//!
//! ## Why Cycles Can't Happen
//!
//! 1. A computed node receives its inputs when it is **created** ([`crate::Node::computed`])
//! 2. Inputs can only be nodes (or values) that **already exist** at that point
//! 3. [`crate::Node`] has **no methods** to add, replace or remove inputs afterwards
//! 4. [`crate::Node::inputs`] hands out a shared slice, never a mutable one
//!
//! ## The Catch-22
//!
//! To create a cycle A→B→A, you would need:
//! - Node A to list node B as an input (requires B to exist)
//! - Node B to list node A as an input (requires A to exist)
//!
//! Whichever is created first cannot mention the other.
//!
//! ## Proof by Compilation Failure
//!
//! ### Proof 1: A Node Cannot Be Its Own Input
//!
//! ```compile_fail,E0425
//! use neet::{Function, Node};
//!
//! let add = Function::new(|a: i64, b: i64| a + b).into_operation();
//!
//! // ERROR: `looped` is not in scope yet
//! let looped = Node::computed(add, (&looped, 1i64));
//! ```
//!
//! ### Proof 2: Inputs Cannot Be Added Later
//!
//! ```compile_fail,E0599
//! use neet::{Function, Node};
//!
//! let add = Function::new(|a: i64, b: i64| a + b).into_operation();
//! let a = Node::new(1i64);
//! let b = Node::computed(add, (&a, 2i64));
//!
//! // ERROR: no method named `add_input` found for struct `Node`
//! a.add_input(&b);
//! ```
//!
//! ### Proof 3: The Input Slice Is Read-Only
//!
//! ```compile_fail,E0599
//! use neet::{Function, Node};
//!
//! let add = Function::new(|a: i64, b: i64| a + b).into_operation();
//! let a = Node::new(1i64);
//! let b = Node::computed(add, (&a, 2i64));
//!
//! // ERROR: no method named `push` found for reference `&[Node<i64>]`
//! b.inputs().push(b.clone());
//! ```
//!
//! ## Implications
//!
//! Because cycles are impossible by construction:
//! - [`crate::Node::realize`] always terminates (barring a non-terminating operation)
//! - [`crate::Node::topological_order`] always succeeds
//! - No runtime cycle detection is needed
