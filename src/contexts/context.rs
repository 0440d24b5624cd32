//! # Execution-context identity and the executor contract.
//!
//! Delivery mode is a two-case decision: a send lands inline when the caller
//! is already running on the receiver's context, and is posted as a deferred
//! job otherwise. That decision needs two things, both defined here:
//!
//! - [`ContextId`]: a process-unique identity per execution context, with a
//!   thread-local notion of "the context currently running on this thread";
//! - [`Executor`]: the injectable contract an execution context
//!   implements: expose its identity and accept posted jobs.
//!
//! ## Rules
//! - An executor marks itself current (via [`ContextId::enter`]) for the
//!   duration of every job it runs; the guard nests and restores on drop,
//!   so reentrant dispatch inside a callback sees the right context.
//! - [`ContextId::current`] returns `None` on threads that are not running
//!   any context's work, which forces deferred delivery (the conservative
//!   case).
//! - Posting to a torn-down context drops the job; delivery failures never
//!   travel back to the sender.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global source of context identities.
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Context whose work this thread is currently executing, if any.
    static CURRENT_CONTEXT: Cell<Option<ContextId>> = const { Cell::new(None) };
}

/// A unit of work posted to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Process-unique identity of an execution context.
///
/// Identities are never reused within a process; comparing two of them is
/// the whole delivery-mode decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocates a fresh identity. Called once per executor.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// The context currently running work on this thread, if any.
    pub fn current() -> Option<Self> {
        CURRENT_CONTEXT.with(Cell::get)
    }

    /// Marks this context current on the calling thread until the returned
    /// guard is dropped.
    ///
    /// Executor implementations wrap each job they run in this guard. Guards
    /// nest: dropping one restores whatever was current before.
    #[must_use]
    pub fn enter(self) -> ContextGuard {
        let prev = CURRENT_CONTEXT.with(|c| c.replace(Some(self)));
        ContextGuard { prev }
    }
}

/// RAII guard restoring the previously-current context on drop.
pub struct ContextGuard {
    prev: Option<ContextId>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|c| c.set(self.prev));
    }
}

/// Contract an execution context implements to take part in dispatch.
///
/// The crate ships [`MailboxExecutor`](crate::MailboxExecutor) as its stock
/// implementation; tests and embedders can provide their own (the dispatcher
/// only ever compares identities and posts jobs).
///
/// Implementations must run posted jobs serially in FIFO order per posting
/// thread, and must hold [`ContextId::enter`] while running each job.
pub trait Executor: Send + Sync + 'static {
    /// Identity of this context, used for the inline-vs-deferred decision.
    fn context_id(&self) -> ContextId;

    /// Queues a job to run on this context. Dropped silently if the context
    /// has shut down.
    fn post(&self, job: Job);
}
