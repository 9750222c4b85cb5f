//! Error types for tracing and realization.
//!
//! The tracer is transparent to operation failures: whatever an operation returns as its
//! error travels back to the caller of [`crate::Node::realize`] (or of an untraced call)
//! untouched, boxed as an [`OpError`]. [`TraceError`] only covers the few ways the tracer
//! itself can be misused at run time.

/// Failure produced by a wrapped operation.
///
/// This is the operation's own error, boxed. Downcast it to recover the concrete type:
///
/// ```
/// use neet::{Function, OpError};
///
/// #[derive(Debug)]
/// struct Overflow;
///
/// impl std::fmt::Display for Overflow {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("overflow")
///     }
/// }
///
/// impl std::error::Error for Overflow {}
///
/// let add = Function::try_new(|a: u8, b: u8| a.checked_add(b).ok_or(Overflow));
/// let err: OpError = add.call(vec![200, 100]).unwrap_err();
/// assert!(err.downcast_ref::<Overflow>().is_some());
/// ```
pub type OpError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of invoking or realizing an operation.
pub type OpResult<T> = Result<T, OpError>;

/// Errors raised by the tracer itself rather than by a wrapped operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TraceError {
    /// A fixed-arity operation was invoked with the wrong number of arguments
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// A stateful object was invoked while one of its own invocations was still running
    ReentrantInvocation { operation: String },
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::ArityMismatch {
                operation,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Operation '{}' takes {} argument{} but was invoked with {}",
                    operation,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    actual
                )
            }
            TraceError::ReentrantInvocation { operation } => {
                write!(
                    f,
                    "Operation '{}' was invoked re-entrantly\n\
                     \n\
                     A stateful object cannot realize a node that calls back into the same object \
                     while it is already running.",
                    operation
                )
            }
        }
    }
}

impl std::error::Error for TraceError {}
