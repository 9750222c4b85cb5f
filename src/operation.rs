//! Operations: the opaque callables a graph defers.
//!
//! - [`Operation<T>`]: shared, type-erased `Fn(Vec<T>) -> OpResult<T>` plus its [`Metadata`].
//!   This is what a computed [`crate::Node`] stores and what realization invokes.
//! - [`Function<T>`]: a plain, unadapted function. Built from closures or fn items of fixed
//!   arity, or from a variadic closure.
//! - [`Invocable`]: implemented by objects whose *being called* is the operation of interest,
//!   usually stateful ones. Use the [`invocable`](crate::invocable) attribute to implement it.
//!
//! Nothing here knows about tracing; see [`crate::make_traceable`] for that.

use std::borrow::Cow;
use std::rc::Rc;

use crate::error::{OpError, OpResult, TraceError};

/// Shared, type-erased operation body
type OperationFn<T> = Rc<dyn Fn(Vec<T>) -> OpResult<T>>;

/// Name and documentation carried by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub doc: Option<String>,
}

impl Metadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
        }
    }
}

/// A callable that a node can defer.
///
/// Cloning is cheap and clones invoke the same underlying callable.
pub struct Operation<T> {
    metadata: Rc<Metadata>,
    call: OperationFn<T>,
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            metadata: Rc::clone(&self.metadata),
            call: Rc::clone(&self.call),
        }
    }
}

impl<T> Operation<T> {
    /// Wrap a callable taking its arguments as a vector.
    pub fn new<F>(metadata: Metadata, call: F) -> Self
    where
        F: Fn(Vec<T>) -> OpResult<T> + 'static,
    {
        Self {
            metadata: Rc::new(metadata),
            call: Rc::new(call),
        }
    }

    /// Invoke the operation with concrete argument values, in order.
    pub fn invoke(&self, args: Vec<T>) -> OpResult<T> {
        (self.call)(args)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.metadata.doc.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether both handles invoke the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }

    fn with_metadata(self, metadata: Metadata) -> Self {
        Self {
            metadata: Rc::new(metadata),
            call: self.call,
        }
    }
}

impl<T> std::fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.metadata.name)
            .field("doc", &self.metadata.doc)
            .finish()
    }
}

/// Check the argument count and destructure the arguments into an array.
///
/// Used by fixed-arity functions and by code generated with `#[invocable]`.
#[doc(hidden)]
pub fn take_args<T, const N: usize>(
    operation: &str,
    args: Vec<T>,
) -> Result<[T; N], TraceError> {
    <[T; N]>::try_from(args).map_err(|args| TraceError::ArityMismatch {
        operation: operation.to_string(),
        expected: N,
        actual: args.len(),
    })
}

/// Last path segment of a type name: `my_crate::math::add` becomes `add`.
///
/// Closures are reported as `closure`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();

    // Last `::` outside generic arguments, so `f<a::B>::{{closure}}` ends in `{{closure}}`
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = full.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => start = i + 2,
            _ => {}
        }
    }

    let segment = &full[start..];
    let segment = segment.split('<').next().unwrap_or(segment);
    if segment == "{{closure}}" {
        "closure"
    } else {
        segment
    }
}

/// Conversion from a fixed-arity infallible closure into an operation body.
///
/// The `Marker` parameter only disambiguates arities; it is inferred.
pub trait IntoOperation<T, Marker>: Sized + 'static {
    #[doc(hidden)]
    fn into_operation_fn(self, name: Rc<str>) -> OperationFn<T>;
}

/// Conversion from a fixed-arity fallible closure into an operation body.
pub trait IntoFallibleOperation<T, Marker>: Sized + 'static {
    #[doc(hidden)]
    fn into_operation_fn(self, name: Rc<str>) -> OperationFn<T>;
}

/// Macro to implement the closure conversions for each arity.
///
/// Rust lacks variadic generics, so every arity gets its own marker `fn(T, ..)` type.
macro_rules! impl_into_operation {
    (@as_t $A:ident, $T:ty) => { $T };
    ($count:literal $(, $A:ident)*) => {
        impl<T, F> IntoOperation<T, fn($(impl_into_operation!(@as_t $A, T),)*)> for F
        where
            T: 'static,
            F: Fn($(impl_into_operation!(@as_t $A, T),)*) -> T + 'static,
        {
            #[allow(non_snake_case)]
            fn into_operation_fn(self, name: Rc<str>) -> OperationFn<T> {
                Rc::new(move |args: Vec<T>| {
                    let [$($A,)*] = take_args::<T, $count>(&name, args)?;
                    Ok(self($($A,)*))
                })
            }
        }

        impl<T, E, F> IntoFallibleOperation<T, fn($(impl_into_operation!(@as_t $A, T),)*)> for F
        where
            T: 'static,
            E: Into<OpError>,
            F: Fn($(impl_into_operation!(@as_t $A, T),)*) -> Result<T, E> + 'static,
        {
            #[allow(non_snake_case)]
            fn into_operation_fn(self, name: Rc<str>) -> OperationFn<T> {
                Rc::new(move |args: Vec<T>| {
                    let [$($A,)*] = take_args::<T, $count>(&name, args)?;
                    self($($A,)*).map_err(Into::into)
                })
            }
        }
    };
}

impl_into_operation!(0);
impl_into_operation!(1, A1);
impl_into_operation!(2, A1, A2);
impl_into_operation!(3, A1, A2, A3);
impl_into_operation!(4, A1, A2, A3, A4);
impl_into_operation!(5, A1, A2, A3, A4, A5);
impl_into_operation!(6, A1, A2, A3, A4, A5, A6);

/// A plain function over values of type `T`.
///
/// `Function` is the unadapted form: calling it always runs it. Pass it to
/// [`crate::make_traceable`] to get a version that records nodes under a [`crate::Tracer`].
///
/// # Examples
///
/// ```
/// use neet::Function;
///
/// fn add(a: i64, b: i64) -> i64 {
///     a + b
/// }
///
/// let f = Function::new(add);
/// assert_eq!(f.name(), "add");
/// assert_eq!(f.call(vec![2, 3]).unwrap(), 5);
///
/// let sum = Function::variadic("sum", |xs: Vec<i64>| Ok(xs.iter().sum()));
/// assert_eq!(sum.call(vec![1, 2, 3, 4]).unwrap(), 10);
/// ```
pub struct Function<T> {
    operation: Operation<T>,
}

impl<T> Clone for Function<T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
        }
    }
}

impl<T: 'static> Function<T> {
    /// Wrap an infallible closure or fn item taking up to 6 arguments of type `T`.
    ///
    /// The name defaults to the item's own name (`add` for `fn add`).
    pub fn new<F, Marker>(f: F) -> Self
    where
        F: IntoOperation<T, Marker>,
    {
        let name = short_type_name::<F>();
        let call = f.into_operation_fn(Rc::from(name));
        Self {
            operation: Operation {
                metadata: Rc::new(Metadata::new(name)),
                call,
            },
        }
    }

    /// Wrap a fallible closure or fn item; its error is passed through as an [`OpError`].
    pub fn try_new<F, Marker>(f: F) -> Self
    where
        F: IntoFallibleOperation<T, Marker>,
    {
        let name = short_type_name::<F>();
        let call = f.into_operation_fn(Rc::from(name));
        Self {
            operation: Operation {
                metadata: Rc::new(Metadata::new(name)),
                call,
            },
        }
    }

    /// Wrap a closure that accepts any number of arguments.
    pub fn variadic<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<T>) -> OpResult<T> + 'static,
    {
        Self {
            operation: Operation::new(Metadata::new(name), f),
        }
    }
}

impl<T> Function<T> {
    /// Rename the function.
    ///
    /// Arity errors raised after renaming still quote the original name.
    pub fn named(self, name: impl Into<String>) -> Self {
        let metadata = Metadata {
            name: name.into(),
            doc: self.operation.metadata.doc.clone(),
        };
        Self {
            operation: self.operation.with_metadata(metadata),
        }
    }

    /// Attach documentation.
    pub fn with_doc(self, doc: impl Into<String>) -> Self {
        let metadata = Metadata {
            name: self.operation.metadata.name.clone(),
            doc: Some(doc.into()),
        };
        Self {
            operation: self.operation.with_metadata(metadata),
        }
    }

    /// Run the function now.
    pub fn call(&self, args: Vec<T>) -> OpResult<T> {
        self.operation.invoke(args)
    }

    pub fn name(&self) -> &str {
        self.operation.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.operation.doc()
    }

    pub fn operation(&self) -> &Operation<T> {
        &self.operation
    }

    pub fn into_operation(self) -> Operation<T> {
        self.operation
    }
}

impl<T> std::fmt::Debug for Function<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("doc", &self.doc())
            .finish()
    }
}

/// An object whose invocation is an operation.
///
/// Implement it by hand, or derive it from an inherent `call` method with the
/// [`invocable`](crate::invocable) attribute:
///
/// ```
/// use neet::{invocable, Invocable};
///
/// struct Accumulator {
///     total: i64,
/// }
///
/// #[invocable]
/// impl Accumulator {
///     /// Add `x` to the running total and return it.
///     fn call(&mut self, x: i64) -> i64 {
///         self.total += x;
///         self.total
///     }
/// }
///
/// let mut acc = Accumulator { total: 0 };
/// assert_eq!(acc.invoke(vec![5]).unwrap(), 5);
/// assert_eq!(acc.invoke(vec![2]).unwrap(), 7);
/// assert_eq!(acc.name(), "Accumulator");
/// ```
pub trait Invocable {
    /// Type of the values the object consumes and produces.
    type Value;

    /// Invoke the object with concrete argument values, in order.
    fn invoke(&mut self, args: Vec<Self::Value>) -> OpResult<Self::Value>;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }

    fn doc(&self) -> Option<Cow<'static, str>> {
        None
    }
}

impl<T> Invocable for Function<T> {
    type Value = T;

    fn invoke(&mut self, args: Vec<T>) -> OpResult<T> {
        self.call(args)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.operation.name().to_string())
    }

    fn doc(&self) -> Option<Cow<'static, str>> {
        self.operation.doc().map(|doc| Cow::Owned(doc.to_string()))
    }
}
