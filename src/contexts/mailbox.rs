//! # Mailbox executor: the crate's stock execution context.
//!
//! [`MailboxExecutor`] is a single-consumer serial job queue: an unbounded
//! channel drained in FIFO order by one spawned worker task. It gives each
//! receiver the actor-mailbox behavior the delivery protocol assumes:
//! deferred deliveries from one sender arrive in send order and run one at a
//! time, never concurrently with each other.
//!
//! ## Diagram
//! ```text
//!    post(job)                         worker task
//!        │                                 │
//!        ├──► [unbounded FIFO queue] ──►  recv ─► enter(id) ─► job()
//!        │                                 │         (context marked
//!        └──► (send-order preserved        │          current while the
//!              per posting thread)         └── loop   job runs)
//! ```
//!
//! ## Rules
//! - One worker per mailbox; jobs never interleave.
//! - A panicking job is caught and logged; the worker keeps draining.
//! - [`MailboxExecutor::shutdown`] (or dropping every handle) stops the
//!   worker; jobs still queued at that point are dropped.
//! - [`MailboxExecutor::flush`] is a quiescence barrier: it resolves after
//!   every job posted before it has run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::{ContextId, Executor, Job};

/// Serial execution context backed by a spawned worker task.
///
/// Must be created from within a tokio runtime (the worker is spawned
/// immediately).
pub struct MailboxExecutor {
    id: ContextId,
    queue: mpsc::UnboundedSender<Job>,
    cancel: CancellationToken,
}

impl MailboxExecutor {
    /// Creates a mailbox and spawns its worker task.
    pub fn new() -> Arc<Self> {
        let id = ContextId::next();
        let (queue, mut jobs) = mpsc::unbounded_channel::<Job>();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    job = jobs.recv() => match job {
                        Some(job) => run_job(id, job),
                        None => break,
                    }
                }
            }
        });

        Arc::new(Self { id, queue, cancel })
    }

    /// Waits until every job posted before this call has finished running.
    ///
    /// Resolves immediately if the mailbox has already shut down.
    pub async fn flush(&self) {
        let (done, waiter) = oneshot::channel();
        let sentinel: Job = Box::new(move || {
            let _ = done.send(());
        });
        if self.queue.send(sentinel).is_ok() {
            let _ = waiter.await;
        }
    }

    /// Stops the worker. Jobs still queued are dropped; posting afterwards
    /// is a silent no-op.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Executor for MailboxExecutor {
    fn context_id(&self) -> ContextId {
        self.id
    }

    fn post(&self, job: Job) {
        if self.queue.send(job).is_err() {
            eprintln!("[herald] context {:?} dropped job: mailbox closed", self.id);
        }
    }
}

/// Runs one job with the context marked current, isolating panics.
fn run_job(id: ContextId, job: Job) {
    let _guard = id.enter();
    if std::panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
        eprintln!("[herald] job panicked on context {:?}", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_jobs_run_in_post_order() {
        let mailbox = MailboxExecutor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let seen = Arc::clone(&seen);
            mailbox.post(Box::new(move || seen.lock().unwrap().push(i)));
        }
        mailbox.flush().await;
        assert_eq!(*seen.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_jobs_see_their_context_as_current() {
        let mailbox = MailboxExecutor::new();
        let id = mailbox.context_id();
        let (tx, rx) = oneshot::channel();
        mailbox.post(Box::new(move || {
            let _ = tx.send(ContextId::current());
        }));
        assert_eq!(rx.await.unwrap(), Some(id));
        assert_eq!(ContextId::current(), None);
    }

    #[tokio::test]
    async fn test_panicking_job_does_not_kill_worker() {
        let mailbox = MailboxExecutor::new();
        let hits = Arc::new(AtomicUsize::new(0));
        mailbox.post(Box::new(|| panic!("boom")));
        let counter = Arc::clone(&hits);
        mailbox.post(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        mailbox.flush().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_post_after_shutdown_is_dropped() {
        let mailbox = MailboxExecutor::new();
        mailbox.shutdown();
        // Give the worker a chance to observe cancellation and exit.
        tokio::task::yield_now().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        mailbox.post(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        mailbox.flush().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
