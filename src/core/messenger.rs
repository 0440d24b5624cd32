//! # Messenger: registration API and dispatch engine.
//!
//! [`Messenger`] is a cheaply clonable handle around one subscription
//! registry. Applications construct it once and pass clones to whatever
//! needs to publish or subscribe; there is no hidden global.
//!
//! ## Architecture
//! ```text
//! register::<M>(receiver, token, cb) ──► Registry (append Subscription)
//!
//! send_to(msg, token)
//!   │
//!   ├─► Envelope::pack(msg)            (type tag resolved once)
//!   ├─► Registry::snapshot()           (lock taken, copied, released)
//!   └─► for each entry, in registration order:
//!         ├─ type/token match?   ── no ─► skip
//!         ├─ receiver alive?     ── no ─► skip
//!         └─ deliver:
//!              caller context == receiver context ─► callback inline
//!              otherwise ─► post job to receiver's executor
//!                           (job re-checks liveness, then calls back)
//! ```
//!
//! ## Rules
//! - The registry lock is released before any callback runs, so a callback
//!   may freely call `send`, `register`, or `unregister` (including
//!   unregistering its own subscription) without deadlocking.
//! - `send` never fails and never reports anything about receivers: no
//!   match, a dead receiver, or a closed mailbox all degrade to skips.
//! - Unregistration stops future sends from selecting a subscription; a
//!   delivery already posted to a mailbox may still run.
//! - Ordering: inline deliveries on one context happen in send order;
//!   deferred deliveries from one sender context to one receiver keep FIFO
//!   through the mailbox. Nothing is promised across sender threads or
//!   across receivers.

use std::any::TypeId;
use std::sync::Arc;

use crate::contexts::{ContextId, Receiver};
use crate::messages::{Envelope, Message, Token};

use super::registry::Registry;
use super::subscription::{DeliveryFn, ReceiverId, Subscription, WeakReceiver};

/// Typed publish/subscribe messenger.
///
/// Clones share the same registry. All operations are safe to call from any
/// thread, concurrently with each other and with deliveries in flight.
///
/// # Example
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use herald::{MailboxExecutor, Messenger, Receiver, Executor, Token};
///
/// struct Ping { code: i32 }
///
/// struct Widget { mailbox: Arc<MailboxExecutor> }
///
/// impl Receiver for Widget {
///     fn executor(&self) -> Arc<dyn Executor> {
///         Arc::clone(&self.mailbox) as Arc<dyn Executor>
///     }
/// }
///
/// # async fn demo() {
/// let messenger = Messenger::new();
/// let widget = Arc::new(Widget { mailbox: MailboxExecutor::new() });
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = Arc::clone(&seen);
/// messenger.register_to(&widget, Token::new("alpha"), move |ping: &Ping| {
///     log.lock().unwrap().push(ping.code);
/// });
///
/// messenger.send_to(Ping { code: 1 }, Token::new("alpha")); // delivered
/// messenger.send_to(Ping { code: 2 }, Token::new("beta"));  // filtered out
/// messenger.unregister(&widget);
/// messenger.send_to(Ping { code: 3 }, Token::new("alpha")); // no longer registered
/// # }
/// ```
#[derive(Clone)]
pub struct Messenger {
    registry: Arc<Registry>,
}

impl Messenger {
    /// Creates a messenger with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::new()),
        }
    }

    /// Subscribes `receiver` to every token of message type `M`.
    ///
    /// Shorthand for [`Messenger::register_to`] with the wildcard token.
    pub fn register<M, R, F>(&self, receiver: &Arc<R>, callback: F)
    where
        M: Message,
        R: Receiver,
        F: Fn(&M) + Send + Sync + 'static,
    {
        self.register_to(receiver, Token::none(), callback);
    }

    /// Subscribes `receiver` to message type `M` under `token`.
    ///
    /// Purely additive: registering the same (receiver, type, token) twice
    /// yields two subscriptions and two deliveries per matching send. The
    /// messenger holds the receiver weakly; see [`Receiver`] for what the
    /// callback may capture.
    pub fn register_to<M, R, F>(&self, receiver: &Arc<R>, token: Token, callback: F)
    where
        M: Message,
        R: Receiver,
        F: Fn(&M) + Send + Sync + 'static,
    {
        let callback: DeliveryFn = Arc::new(move |envelope: &Envelope| {
            match envelope.unpack::<M>() {
                Ok(message) => callback(message),
                // Unreachable while registration pairs tag and callback
                // type; an internal defect, not a user-facing condition.
                Err(err) => {
                    debug_assert!(false, "subscription type pairing broken: {err}");
                    eprintln!("[herald] dropped delivery: {err}");
                }
            }
        });
        self.registry.insert(Subscription {
            type_id: TypeId::of::<M>(),
            token,
            receiver: WeakReceiver::track(receiver),
            callback,
        });
    }

    /// Removes every subscription of `receiver`, across all types and
    /// tokens. Idempotent; a no-op for unknown receivers.
    pub fn unregister<R: Receiver>(&self, receiver: &Arc<R>) {
        self.registry.remove_receiver(ReceiverId::of(receiver));
    }

    /// Removes subscriptions of `receiver` for message type `M`.
    ///
    /// An empty token removes every token of that type; otherwise only the
    /// exact token. Idempotent.
    pub fn unregister_message<M, R>(&self, receiver: &Arc<R>, token: Token)
    where
        M: Message,
        R: Receiver,
    {
        self.registry
            .remove_message(ReceiverId::of(receiver), TypeId::of::<M>(), &token);
    }

    /// Reclaims subscriptions whose receiver has died.
    ///
    /// Optional housekeeping: sends already skip dead entries on their own.
    pub fn cleanup(&self) {
        self.registry.purge_dead();
    }

    /// Number of currently registered subscriptions, dead or alive.
    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }

    /// Broadcasts `message` with the wildcard token.
    pub fn send<M: Message>(&self, message: M) {
        self.send_to(message, Token::none());
    }

    /// Broadcasts `message` to every matching live subscription.
    ///
    /// Never fails: a send with no matching subscription is dropped
    /// silently, and nothing about any receiver's state propagates back to
    /// the caller.
    pub fn send_to<M: Message>(&self, message: M, token: Token) {
        let envelope = Envelope::pack(message);
        let snapshot = self.registry.snapshot();
        let caller = ContextId::current();

        for subscription in &snapshot {
            if !subscription.accepts(envelope.type_id(), &token) {
                continue;
            }
            let Some(receiver) = subscription.receiver.upgrade() else {
                continue;
            };
            let executor = receiver.executor();
            // Strong reference held only long enough to resolve the
            // executor; the deferred path re-upgrades at run time.
            drop(receiver);

            if caller == Some(executor.context_id()) {
                (subscription.callback)(&envelope);
            } else {
                let callback = Arc::clone(&subscription.callback);
                let envelope = envelope.clone();
                let target = subscription.receiver.clone();
                executor.post(Box::new(move || {
                    if let Some(_alive) = target.upgrade() {
                        callback(&envelope);
                    }
                }));
            }
        }
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}
