//! The traceable adapter.
//!
//! [`make_traceable`] turns a plain [`Function`] or a shared [`Invocable`] object into a
//! callable that decides, on every call, whether to run or to record:
//!
//! - no [`crate::Tracer`] active: the underlying callable runs with the given arguments and
//!   its result comes back as [`Traced::Value`], exactly as a direct call would produce it;
//! - a tracer active: nothing runs. The call comes back as [`Traced::Node`], a computed node
//!   whose operation is the original callable and whose inputs are the arguments.
//!
//! The strategy (function or object) is picked once, at adaptation time, by the
//! [`IntoTraceable`] implementation. Both strategies expose the same surface: `call`, the
//! original name and documentation, and the traceable marker read by [`is_traceable`].
//!
//! Only functions and shared invocable objects can be adapted. Anything else is rejected by
//! the compiler:
//!
//! ```compile_fail
//! use neet::make_traceable;
//!
//! // `u32` is not invocable
//! let traced = make_traceable(42u32);
//! ```

use std::borrow::Cow;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::args::IntoArgs;
use crate::error::{OpResult, TraceError};
use crate::node::Node;
use crate::operation::{short_type_name, Function, Invocable, Metadata, Operation};
use crate::tracer::under_trace;

/// Outcome of calling an adapted callable.
pub enum Traced<T> {
    /// Recorded under an active tracer; nothing ran yet
    Node(Node<T>),
    /// Ran immediately
    Value(T),
}

impl<T> Traced<T> {
    pub fn is_node(&self) -> bool {
        matches!(self, Traced::Node(_))
    }

    pub fn node(&self) -> Option<&Node<T>> {
        match self {
            Traced::Node(node) => Some(node),
            Traced::Value(_) => None,
        }
    }

    /// The immediate value, if the call ran.
    pub fn value(&self) -> Option<&T> {
        match self {
            Traced::Node(_) => None,
            Traced::Value(value) => Some(value),
        }
    }

    /// The recorded node, or the immediate value wrapped as a constant.
    pub fn into_node(self) -> Node<T> {
        match self {
            Traced::Node(node) => node,
            Traced::Value(value) => Node::new(value),
        }
    }
}

impl<T: Clone> Traced<T> {
    /// The immediate value, or the recorded node realized.
    pub fn into_value(self) -> OpResult<T> {
        match self {
            Traced::Node(node) => node.realize(),
            Traced::Value(value) => Ok(value),
        }
    }
}

impl<T: Clone> Clone for Traced<T> {
    fn clone(&self) -> Self {
        match self {
            Traced::Node(node) => Traced::Node(node.clone()),
            Traced::Value(value) => Traced::Value(value.clone()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Traced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Traced::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Traced::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Which adaptation strategy produced a traceable callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A plain function was wrapped
    Function,
    /// The invocation of a shared object was wrapped; the object itself is untouched
    Object,
}

/// An adapted callable.
///
/// Produced by [`make_traceable`] for functions, and used as the invocation of every
/// [`TracedObject`].
pub struct TracedFn<T> {
    operation: Operation<T>,
    strategy: Strategy,
}

impl<T> Clone for TracedFn<T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            strategy: self.strategy,
        }
    }
}

impl<T> TracedFn<T> {
    /// The original, unadapted operation.
    pub fn operation(&self) -> &Operation<T> {
        &self.operation
    }

    pub fn name(&self) -> &str {
        self.operation.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.operation.doc()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl<T: Clone + 'static> TracedFn<T> {
    /// Run now, or record a node if a tracer is active on this thread.
    ///
    /// Node arguments given outside a tracing scope are realized before the call.
    ///
    /// # Errors
    ///
    /// Only untraced calls can fail, with the operation's own error (or the error of a node
    /// argument being realized). Recording never fails.
    pub fn call(&self, args: impl IntoArgs<T>) -> OpResult<Traced<T>> {
        let args = args.into_args();

        if under_trace() {
            return Ok(Traced::Node(Node::computed(self.operation.clone(), args)));
        }

        #[cfg(feature = "tracing")]
        trace!(operation = self.name(), "invoking without tracer");

        let values = args.into_values()?;
        self.operation.invoke(values).map(Traced::Value)
    }
}

impl<T> std::fmt::Debug for TracedFn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedFn")
            .field("name", &self.name())
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// A shared object whose invocation has been adapted.
///
/// The object keeps its identity and state: [`TracedObject::shared`] is the very `Rc` that was
/// adapted, and [`TracedObject::borrow`] / [`TracedObject::borrow_mut`] reach its other members.
/// Only [`TracedObject::call`] is intercepted.
///
/// # Examples
///
/// ```
/// use neet::{invocable, TracedObject, Tracer};
///
/// struct Accumulator {
///     total: i64,
/// }
///
/// #[invocable]
/// impl Accumulator {
///     fn call(&mut self, x: i64) -> i64 {
///         self.total += x;
///         self.total
///     }
/// }
///
/// let acc = TracedObject::new(Accumulator { total: 0 });
///
/// let last = Tracer::new().scope(|| {
///     let _first = acc.call((1i64,)).unwrap();
///     let _second = acc.call((2i64,)).unwrap();
///     acc.call((3i64,)).unwrap().into_node()
/// });
///
/// // Nothing ran while tracing
/// assert_eq!(acc.borrow().total, 0);
///
/// // Only the realized node touches the state
/// assert_eq!(last.realize().unwrap(), 3);
/// assert_eq!(acc.borrow().total, 3);
/// ```
pub struct TracedObject<O: Invocable> {
    object: Rc<RefCell<O>>,
    invocation: TracedFn<O::Value>,
}

impl<O: Invocable> Clone for TracedObject<O> {
    fn clone(&self) -> Self {
        Self {
            object: Rc::clone(&self.object),
            invocation: self.invocation.clone(),
        }
    }
}

impl<O> TracedObject<O>
where
    O: Invocable + 'static,
    O::Value: Clone + 'static,
{
    /// Share `object` and adapt its invocation.
    pub fn new(object: O) -> Self {
        make_traceable(Rc::new(RefCell::new(object)))
    }

    /// Invoke the object now, or record a node if a tracer is active on this thread.
    pub fn call(&self, args: impl IntoArgs<O::Value>) -> OpResult<Traced<O::Value>> {
        self.invocation.call(args)
    }
}

impl<O: Invocable> TracedObject<O> {
    /// The adapted invocation, which carries the traceable marker.
    pub fn invocation(&self) -> &TracedFn<O::Value> {
        &self.invocation
    }

    /// The adapted object itself.
    pub fn shared(&self) -> &Rc<RefCell<O>> {
        &self.object
    }

    /// Borrow the object.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed mutably, like [`RefCell::borrow`].
    pub fn borrow(&self) -> Ref<'_, O> {
        self.object.borrow()
    }

    /// Borrow the object mutably.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed, like [`RefCell::borrow_mut`].
    pub fn borrow_mut(&self) -> RefMut<'_, O> {
        self.object.borrow_mut()
    }

    pub fn name(&self) -> &str {
        self.invocation.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.invocation.doc()
    }
}

impl<O: Invocable> std::fmt::Debug for TracedObject<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedObject")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Things [`make_traceable`] accepts.
///
/// Implemented for [`Function<T>`] (adapted as a function) and for `Rc<RefCell<O>>` with
/// `O: Invocable` (adapted as an object, in place).
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not invocable and cannot be made traceable",
    label = "not a `Function` or a shared `Invocable` object",
    note = "wrap functions with `Function::new` and objects with `Rc::new(RefCell::new(..))`"
)]
pub trait IntoTraceable {
    type Traced;

    fn into_traceable(self) -> Self::Traced;
}

impl<T: Clone + 'static> IntoTraceable for Function<T> {
    type Traced = TracedFn<T>;

    fn into_traceable(self) -> TracedFn<T> {
        TracedFn {
            operation: self.into_operation(),
            strategy: Strategy::Function,
        }
    }
}

impl<O> IntoTraceable for Rc<RefCell<O>>
where
    O: Invocable + 'static,
    O::Value: Clone + 'static,
{
    type Traced = TracedObject<O>;

    fn into_traceable(self) -> TracedObject<O> {
        let metadata = object_metadata(&self);
        let operation_name = metadata.name.clone();
        let target = Rc::clone(&self);

        let operation = Operation::new(metadata, move |args: Vec<O::Value>| {
            let mut object =
                target
                    .try_borrow_mut()
                    .map_err(|_| TraceError::ReentrantInvocation {
                        operation: operation_name.clone(),
                    })?;
            object.invoke(args)
        });

        TracedObject {
            object: self,
            invocation: TracedFn {
                operation,
                strategy: Strategy::Object,
            },
        }
    }
}

fn object_metadata<O: Invocable>(object: &RefCell<O>) -> Metadata {
    match object.try_borrow() {
        Ok(object) => Metadata {
            name: Invocable::name(&*object).into_owned(),
            doc: Invocable::doc(&*object).map(Cow::into_owned),
        },
        // Mutably borrowed elsewhere: fall back to the type name
        Err(_) => Metadata::new(short_type_name::<O>()),
    }
}

/// Adapt a function or a shared invocable object so that it records nodes under a tracer.
///
/// # Examples
///
/// ```
/// use neet::{is_traceable, make_traceable, Function, Node, Tracer};
///
/// fn add(a: i64, b: i64) -> i64 {
///     a + b
/// }
///
/// let plain = Function::new(add);
/// assert!(!is_traceable(&plain));
///
/// let add = make_traceable(plain);
/// assert!(is_traceable(&add));
/// assert_eq!(add.name(), "add");
///
/// // No tracer: runs now
/// assert_eq!(add.call((2i64, 3i64)).unwrap().value(), Some(&5));
///
/// // Under a tracer: records a node
/// let node = Tracer::new().scope(|| add.call((Node::new(2i64), 3i64)).unwrap());
/// assert!(node.is_node());
/// assert_eq!(node.into_value().unwrap(), 5);
/// ```
pub fn make_traceable<I: IntoTraceable>(invocable: I) -> I::Traced {
    #[cfg(feature = "tracing")]
    debug!(invocable = std::any::type_name::<I>(), "adapting invocable");

    invocable.into_traceable()
}

/// Introspection shared by adapted and unadapted callables.
pub trait Introspect {
    fn name(&self) -> Cow<'_, str>;

    fn doc(&self) -> Option<Cow<'_, str>>;

    /// Whether this was produced by [`make_traceable`].
    fn is_traceable(&self) -> bool;
}

impl<T> Introspect for Function<T> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(Function::name(self))
    }

    fn doc(&self) -> Option<Cow<'_, str>> {
        Function::doc(self).map(Cow::Borrowed)
    }

    fn is_traceable(&self) -> bool {
        false
    }
}

impl<O: Invocable> Introspect for Rc<RefCell<O>> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(object_metadata(self).name)
    }

    fn doc(&self) -> Option<Cow<'_, str>> {
        object_metadata(self).doc.map(Cow::Owned)
    }

    fn is_traceable(&self) -> bool {
        false
    }
}

impl<T> Introspect for TracedFn<T> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.operation.name())
    }

    fn doc(&self) -> Option<Cow<'_, str>> {
        self.operation.doc().map(Cow::Borrowed)
    }

    fn is_traceable(&self) -> bool {
        true
    }
}

impl<O: Invocable> Introspect for TracedObject<O> {
    fn name(&self) -> Cow<'_, str> {
        Introspect::name(&self.invocation)
    }

    fn doc(&self) -> Option<Cow<'_, str>> {
        Introspect::doc(&self.invocation)
    }

    // The marker lives on the invocation, not on the object
    fn is_traceable(&self) -> bool {
        self.invocation.is_traceable()
    }
}

/// Whether `invocable` was produced by [`make_traceable`].
///
/// Adapted objects answer through their invocation. Unadapted functions and shared objects
/// report `false`.
pub fn is_traceable<I: Introspect + ?Sized>(invocable: &I) -> bool {
    invocable.is_traceable()
}
