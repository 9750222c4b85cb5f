//! Graph nodes and memoized realization.
//!
//! A [`Node<T>`] is a cheap, shared handle onto an immutable vertex:
//!
//! - **Constant leaf**: no operation, no inputs, value populated at construction.
//! - **Computed node**: an [`Operation`] over ordered input nodes, value empty until the
//!   first successful [`Node::realize`], then cached for good.
//!
//! Inputs are shared (`Rc`), so one node can feed many dependents without duplication.
//! Cycles cannot be built: a node can only reference nodes that already exist. See
//! [`crate::cycle_prevention`].

use std::cell::OnceCell;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::args::IntoArgs;
use crate::error::OpResult;
use crate::operation::Operation;

struct NodeInner<T> {
    label: Option<String>,
    operation: Option<Operation<T>>,
    inputs: Vec<Node<T>>,
    cached: OnceCell<T>,
}

/// A vertex of a deferred computation graph.
///
/// Cloning a `Node` clones the handle, not the vertex. Equality and hashing follow identity.
///
/// # Examples
///
/// ```
/// use neet::{Function, Node};
///
/// let add = Function::new(|a: i64, b: i64| a + b).named("add");
///
/// let a = Node::new(1);
/// let b = Node::constant(2, "b");
/// let c = Node::computed(add.into_operation(), (&a, &b));
///
/// assert!(!c.is_realized());
/// assert_eq!(c.realize().unwrap(), 3);
/// assert!(c.is_realized());
/// assert_eq!(c.label(), Some("add"));
/// ```
pub struct Node<T>(Rc<NodeInner<T>>);

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Node(Rc::clone(&self.0))
    }
}

impl<T> Node<T> {
    /// Create an unlabelled constant leaf.
    pub fn new(value: T) -> Self {
        Self::constant_with(value, None)
    }

    /// Create a labelled constant leaf.
    pub fn constant(value: T, label: impl Into<String>) -> Self {
        Self::constant_with(value, Some(label.into()))
    }

    pub(crate) fn constant_with(value: T, label: Option<String>) -> Self {
        #[cfg(feature = "tracing")]
        trace!(label = ?label, "wrapping constant");

        Node(Rc::new(NodeInner {
            label,
            operation: None,
            inputs: Vec::new(),
            cached: OnceCell::from(value),
        }))
    }

    /// Create a computed node labelled with the operation's name.
    ///
    /// Arguments become the node's inputs in order: positional first, then keyword. Plain
    /// values are wrapped as constants; nothing is evaluated.
    pub fn computed(operation: Operation<T>, args: impl IntoArgs<T>) -> Self {
        let label = Some(operation.name().to_string());
        Self::computed_with_label(operation, args, label)
    }

    /// Create a computed node with an explicit label (`None` leaves it unset).
    pub fn computed_with_label(
        operation: Operation<T>,
        args: impl IntoArgs<T>,
        label: Option<String>,
    ) -> Self {
        let inputs = args.into_args().into_nodes();

        #[cfg(feature = "tracing")]
        debug!(
            operation = operation.name(),
            label = ?label,
            input_count = inputs.len(),
            "recording computed node"
        );

        Node(Rc::new(NodeInner {
            label,
            operation: Some(operation),
            inputs,
            cached: OnceCell::new(),
        }))
    }

    pub fn label(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    /// The deferred operation; `None` for constants.
    pub fn operation(&self) -> Option<&Operation<T>> {
        self.0.operation.as_ref()
    }

    pub fn inputs(&self) -> &[Node<T>] {
        &self.0.inputs
    }

    pub fn is_constant(&self) -> bool {
        self.0.operation.is_none()
    }

    /// Whether the value is available without running anything.
    pub fn is_realized(&self) -> bool {
        self.0.cached.get().is_some()
    }

    /// The cached value, if any. Never triggers evaluation.
    pub fn cached(&self) -> Option<&T> {
        self.0.cached.get()
    }

    /// Whether both handles point at the same vertex.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Every node reachable from this one, each once, inputs before their dependents.
    ///
    /// Traversal is depth-first, left to right, which is also the order in which
    /// [`Node::realize`] would run the operations of an unrealized graph.
    pub fn topological_order(&self) -> Vec<Node<T>> {
        let mut seen: HashSet<*const NodeInner<T>> = HashSet::new();
        let mut order = Vec::new();
        // (node, whether its inputs have been pushed)
        let mut stack: Vec<(Node<T>, bool)> = vec![(self.clone(), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            if !seen.insert(Rc::as_ptr(&node.0)) {
                continue;
            }
            stack.push((node.clone(), true));
            // Reverse so the leftmost input is visited first
            for input in node.inputs().iter().rev() {
                if !seen.contains(&Rc::as_ptr(&input.0)) {
                    stack.push((input.clone(), false));
                }
            }
        }

        order
    }

    /// Unrealized nodes reachable from this one, inputs before their dependents.
    ///
    /// Same traversal as [`Node::topological_order`], except that realized nodes are neither
    /// listed nor expanded.
    fn pending_order(&self) -> Vec<Node<T>> {
        let mut seen: HashSet<*const NodeInner<T>> = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<(Node<T>, bool)> = vec![(self.clone(), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            if node.is_realized() || !seen.insert(Rc::as_ptr(&node.0)) {
                continue;
            }
            stack.push((node.clone(), true));
            for input in node.inputs().iter().rev() {
                if !input.is_realized() && !seen.contains(&Rc::as_ptr(&input.0)) {
                    stack.push((input.clone(), false));
                }
            }
        }

        order
    }
}

impl<T: Clone> Node<T> {
    /// Force evaluation and return the value.
    ///
    /// Cached values are returned as-is. Otherwise every input is realized (depth-first, left
    /// to right), the operation is invoked with their values, and the result is cached. An
    /// operation therefore runs at most once per node, however many times it is realized and
    /// however many nodes depend on it.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error unchanged. Nothing is cached in that case, so a later
    /// call invokes the operation again.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip(self), fields(label = ?self.label()))
    )]
    pub fn realize(&self) -> OpResult<T> {
        if let Some(value) = self.0.cached.get() {
            #[cfg(feature = "tracing")]
            trace!("cache hit");

            return Ok(value.clone());
        }

        // Inputs come before their dependents, so every input is cached by the time a node runs
        for node in self.pending_order() {
            let operation = match &node.0.operation {
                Some(operation) => operation,
                // Constants are populated at construction
                None => unreachable!("constant node without a value"),
            };

            let values: Vec<T> = node
                .0
                .inputs
                .iter()
                .map(|input| match input.0.cached.get() {
                    Some(value) => value.clone(),
                    None => unreachable!("input realized after its dependent"),
                })
                .collect();

            #[cfg(feature = "tracing")]
            debug!(
                operation = operation.name(),
                label = ?node.label(),
                arg_count = values.len(),
                "invoking deferred operation"
            );

            let value = operation.invoke(values)?;
            // Acyclic graphs cannot re-enter this node while its operation runs, so the cell is
            // still empty here.
            let _ = node.0.cached.set(value);
        }

        match self.0.cached.get() {
            Some(value) => Ok(value.clone()),
            None => unreachable!("realized node without a value"),
        }
    }

    /// Alias for [`Node::realize`].
    pub fn value(&self) -> OpResult<T> {
        self.realize()
    }

    /// A new constant holding this node's realized value and label, without its lineage.
    pub fn detach(&self) -> OpResult<Node<T>> {
        let value = self.realize()?;
        Ok(Node::constant_with(value, self.0.label.clone()))
    }
}

impl<T: std::fmt::Debug> Node<T> {
    /// Render the graph below this node as an indented tree.
    ///
    /// Shared inputs are printed under every dependent.
    ///
    /// ```
    /// use neet::{Function, Node};
    ///
    /// let mul = Function::new(|a: i64, b: i64| a * b).named("mul");
    /// let x = Node::constant(3, "x");
    /// let sq = Node::computed(mul.into_operation(), (&x, &x));
    ///
    /// assert_eq!(sq.render(), "mul = <pending>\n  x = 3\n  x = 3\n");
    /// ```
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let mut stack = vec![(self.clone(), 0usize)];
        while let Some((node, indent)) = stack.pop() {
            let prefix = "  ".repeat(indent);
            let label = node.label().unwrap_or("<unnamed>");
            let _ = match node.cached() {
                Some(value) => writeln!(out, "{}{} = {:?}", prefix, label, value),
                None => writeln!(out, "{}{} = <pending>", prefix, label),
            };
            // Reverse so the leftmost input is printed first
            for input in node.inputs().iter().rev() {
                stack.push((input.clone(), indent + 1));
            }
        }
        out
    }
}

impl<T: std::fmt::Debug> std::fmt::Display for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("label", &self.label())
            .field("operation", &self.operation().map(Operation::name))
            .field("value", &self.cached())
            .field("inputs", &self.inputs().len())
            .finish()
    }
}

// Tear down input chains with a work list; the default drop would recurse once per level
impl<T> Drop for NodeInner<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.inputs);
        while let Some(node) = pending.pop() {
            // Only drain nodes whose last handle is going away; shared ones stay intact
            if let Some(mut inner) = Rc::into_inner(node.0) {
                pending.append(&mut inner.inputs);
            }
        }
    }
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Node<T> {}

impl<T> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}
