//! Call arguments for nodes and adapted operations.
//!
//! An argument is either a [`Node`] or a plain value. Plain values are wrapped as constant
//! leaves when a node is built ([`to_node`]); that wrapping is pure data capture.
//!
//! Arguments can be given as tuples (macro-generated for sizes 1-8), as a `Vec<Arg<T>>`, or
//! as an [`Args`] builder when keyword arguments are needed.

use crate::adapter::Traced;
use crate::error::OpResult;
use crate::node::Node;

/// A single call argument.
pub enum Arg<T> {
    Node(Node<T>),
    Value(T),
}

impl<T> Arg<T> {
    pub fn is_node(&self) -> bool {
        matches!(self, Arg::Node(_))
    }
}

impl<T: Clone> Arg<T> {
    /// The concrete value, realizing a node argument if needed.
    pub fn into_value(self) -> OpResult<T> {
        match self {
            Arg::Node(node) => node.realize(),
            Arg::Value(value) => Ok(value),
        }
    }
}

impl<T: Clone> Clone for Arg<T> {
    fn clone(&self) -> Self {
        match self {
            Arg::Node(node) => Arg::Node(node.clone()),
            Arg::Value(value) => Arg::Value(value.clone()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl<T> From<T> for Arg<T> {
    fn from(value: T) -> Self {
        Arg::Value(value)
    }
}

impl<T> From<Node<T>> for Arg<T> {
    fn from(node: Node<T>) -> Self {
        Arg::Node(node)
    }
}

impl<T> From<&Node<T>> for Arg<T> {
    fn from(node: &Node<T>) -> Self {
        Arg::Node(node.clone())
    }
}

impl<T> From<Traced<T>> for Arg<T> {
    fn from(traced: Traced<T>) -> Self {
        match traced {
            Traced::Node(node) => Arg::Node(node),
            Traced::Value(value) => Arg::Value(value),
        }
    }
}

/// Convert an argument into a node.
///
/// Total: nodes pass through, values become constant leaves labelled `label`.
pub fn to_node<T>(arg: Arg<T>, label: Option<String>) -> Node<T> {
    match arg {
        Arg::Node(node) => node,
        Arg::Value(value) => Node::constant_with(value, label),
    }
}

/// Ordered positional and keyword arguments.
///
/// Keyword arguments keep their insertion order and always come after the positional ones.
///
/// ```
/// use neet::{Args, Node};
///
/// let args: Args<i64> = Args::new()
///     .arg(Node::new(1))
///     .arg(2i64)
///     .kwarg("scale", 10i64);
/// assert_eq!(args.len(), 3);
/// ```
pub struct Args<T> {
    pub(crate) positional: Vec<Arg<T>>,
    pub(crate) keyword: Vec<(String, Arg<T>)>,
}

impl<T> Default for Args<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Args<T> {
    pub fn new() -> Self {
        Self {
            positional: Vec::new(),
            keyword: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<Arg<T>>) -> Self {
        self.positional.push(arg.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, arg: impl Into<Arg<T>>) -> Self {
        self.keyword.push((name.into(), arg.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Collate into input nodes: positional first, then keyword values.
    ///
    /// Wrapped positional values are labelled with their type name, wrapped keyword values
    /// with their keyword.
    pub(crate) fn into_nodes(self) -> Vec<Node<T>> {
        let value_label = crate::operation::short_type_name::<T>();
        let positional = self
            .positional
            .into_iter()
            .map(|arg| to_node(arg, Some(value_label.to_string())));
        let keyword = self
            .keyword
            .into_iter()
            .map(|(name, arg)| to_node(arg, Some(name)));
        positional.chain(keyword).collect()
    }
}

impl<T: Clone> Args<T> {
    /// Concrete values in call order, realizing node arguments.
    pub(crate) fn into_values(self) -> OpResult<Vec<T>> {
        self.positional
            .into_iter()
            .chain(self.keyword.into_iter().map(|(_, arg)| arg))
            .map(Arg::into_value)
            .collect()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Args<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("positional", &self.positional)
            .field("keyword", &self.keyword)
            .finish()
    }
}

/// Anything that can be turned into call arguments.
///
/// This trait is not meant for external implementation. Use the provided implementations.
pub trait IntoArgs<T> {
    fn into_args(self) -> Args<T>;
}

impl<T> IntoArgs<T> for Args<T> {
    fn into_args(self) -> Args<T> {
        self
    }
}

impl<T> IntoArgs<T> for Vec<Arg<T>> {
    fn into_args(self) -> Args<T> {
        Args {
            positional: self,
            keyword: Vec::new(),
        }
    }
}

// Implementation for unit (no arguments)
impl<T> IntoArgs<T> for () {
    fn into_args(self) -> Args<T> {
        Args::new()
    }
}

/// Macro to implement IntoArgs for different tuple sizes.
///
/// This macro exists because Rust lacks variadic generics - we need separate implementations
/// for each tuple size. Each element may independently be a value, a `Node`, a `&Node` or a
/// `Traced` result:
/// ```ignore
/// add.call((&a, 2))
/// ```
macro_rules! impl_into_args_tuple {
    ($($A:ident),+) => {
        impl<T, $($A: Into<Arg<T>>),+> IntoArgs<T> for ($($A,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Args<T> {
                let ($($A,)+) = self;
                Args {
                    positional: vec![$($A.into(),)+],
                    keyword: Vec::new(),
                }
            }
        }
    };
}

// Generate IntoArgs implementations for tuples of size 1-8.
impl_into_args_tuple!(A1);
impl_into_args_tuple!(A1, A2);
impl_into_args_tuple!(A1, A2, A3);
impl_into_args_tuple!(A1, A2, A3, A4);
impl_into_args_tuple!(A1, A2, A3, A4, A5);
impl_into_args_tuple!(A1, A2, A3, A4, A5, A6);
impl_into_args_tuple!(A1, A2, A3, A4, A5, A6, A7);
impl_into_args_tuple!(A1, A2, A3, A4, A5, A6, A7, A8);
