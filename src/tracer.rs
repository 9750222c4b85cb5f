//! Tracing-mode control.
//!
//! Each thread has at most one *current* [`Tracer`]. Entering a tracer installs it as current
//! and hands back a [`TraceGuard`] that remembers what was current before; dropping the guard
//! puts that back. Guards nest like a stack, so the innermost scope is always the effective
//! one and leaving it reactivates exactly the scope that was active before it.
//!
//! Restoration happens in `Drop`, which also runs while unwinding from a panic.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

static NEXT_TRACER_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: RefCell<Option<Tracer>> = const { RefCell::new(None) };
}

/// Options accepted when a [`Tracer`] is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracerOptions {
    /// Marks the tracer as imperative.
    ///
    /// The flag is stored and can be queried with [`Tracer::is_imperative`]; it does not change
    /// whether adapted calls are recorded.
    pub imperative: bool,
}

struct TracerInner {
    id: u64,
    options: TracerOptions,
}

/// A tracing context.
///
/// While a tracer is entered, calls made through [`crate::make_traceable`] adapters record
/// [`crate::Node`]s instead of running.
///
/// Tracers are cheap to clone; clones share identity.
///
/// # Examples
///
/// ```
/// use neet::{under_trace, Tracer};
///
/// let outer = Tracer::new();
/// let inner = Tracer::new();
///
/// assert!(!under_trace());
/// {
///     let _a = outer.enter();
///     {
///         let _b = inner.enter();
///         assert!(inner.is_active());
///     }
///     // leaving `inner` reactivates `outer`, not "no tracing"
///     assert!(outer.is_active());
/// }
/// assert!(!under_trace());
/// ```
#[derive(Clone)]
pub struct Tracer(Rc<TracerInner>);

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracer {
    /// Create a tracer with default options.
    pub fn new() -> Self {
        Self::with_options(TracerOptions::default())
    }

    /// Create a tracer flagged as imperative.
    pub fn imperative() -> Self {
        Self::with_options(TracerOptions { imperative: true })
    }

    pub fn with_options(options: TracerOptions) -> Self {
        Tracer(Rc::new(TracerInner {
            id: NEXT_TRACER_ID.fetch_add(1, Ordering::Relaxed),
            options,
        }))
    }

    /// Process-unique identifier of this tracer.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn options(&self) -> TracerOptions {
        self.0.options
    }

    pub fn is_imperative(&self) -> bool {
        self.0.options.imperative
    }

    /// Whether this tracer is the innermost active one on the current thread.
    pub fn is_active(&self) -> bool {
        current().is_some_and(|cur| cur == *self)
    }

    /// Make this tracer current until the returned guard is dropped.
    ///
    /// The tracer that was current before (if any) is restored when the guard drops, no
    /// matter how deeply scopes are nested or how the scope is left.
    pub fn enter(&self) -> TraceGuard {
        let previous = CURRENT.with(|cur| cur.borrow_mut().replace(self.clone()));

        #[cfg(feature = "tracing")]
        debug!(
            tracer_id = self.id(),
            previous_id = previous.as_ref().map(Tracer::id),
            imperative = self.is_imperative(),
            "entering trace scope"
        );

        TraceGuard {
            entered: self.clone(),
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with this tracer active.
    ///
    /// ```
    /// use neet::{under_trace, Tracer};
    ///
    /// let traced = Tracer::new().scope(under_trace);
    /// assert!(traced);
    /// assert!(!under_trace());
    /// ```
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }
}

impl PartialEq for Tracer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Tracer {}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("id", &self.0.id)
            .field("imperative", &self.0.options.imperative)
            .finish()
    }
}

/// Scope guard returned by [`Tracer::enter`].
///
/// Dropping it restores whichever tracer was current when the scope was entered. Guards are
/// not `Send`: a scope is closed on the thread that opened it.
#[must_use = "the trace scope ends as soon as the guard is dropped"]
pub struct TraceGuard {
    entered: Tracer,
    previous: Option<Tracer>,
    _not_send: PhantomData<*const ()>,
}

impl TraceGuard {
    /// The tracer this guard activated.
    pub fn tracer(&self) -> &Tracer {
        &self.entered
    }
}

impl Drop for TraceGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // try_with: thread-local storage may already be gone if the guard outlives it
        let _ = CURRENT.try_with(|cur| {
            let replaced = std::mem::replace(&mut *cur.borrow_mut(), previous);

            #[cfg(feature = "tracing")]
            {
                if replaced.as_ref() != Some(&self.entered) {
                    warn!(
                        tracer_id = self.entered.id(),
                        current_id = replaced.as_ref().map(Tracer::id),
                        "trace scope exited out of order"
                    );
                }
                debug!(tracer_id = self.entered.id(), "leaving trace scope");
            }

            #[cfg(not(feature = "tracing"))]
            let _ = replaced;
        });
    }
}

impl std::fmt::Debug for TraceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceGuard")
            .field("entered", &self.entered)
            .field("previous", &self.previous)
            .finish()
    }
}

/// Whether a tracer is active on the current thread.
pub fn under_trace() -> bool {
    CURRENT.with(|cur| cur.borrow().is_some())
}

/// The innermost active tracer on the current thread.
pub fn current() -> Option<Tracer> {
    CURRENT.with(|cur| cur.borrow().clone())
}
