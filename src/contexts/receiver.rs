//! The receiver contract.

use std::sync::Arc;

use super::Executor;

/// An entity that can be the target of subscriptions.
///
/// The messenger never owns a receiver: registration stores a weak
/// reference, and the application keeps the `Arc` alive for as long as it
/// wants deliveries. Dropping the last strong reference makes every
/// subscription for that receiver non-deliverable (and reclaimable by
/// [`Messenger::cleanup`](crate::Messenger::cleanup)).
///
/// The associated executor decides delivery mode: sends issued while already
/// running on that executor's context are invoked inline, everything else is
/// posted to its queue.
///
/// Callbacks registered for a receiver should not capture a strong `Arc` of
/// that same receiver: the registry holds the callback, so such a capture
/// would keep the receiver alive past its last external reference. Capture a
/// [`Weak`](std::sync::Weak) and upgrade inside the callback instead.
pub trait Receiver: Send + Sync + 'static {
    /// The execution context this receiver's deliveries belong to.
    fn executor(&self) -> Arc<dyn Executor>;
}
