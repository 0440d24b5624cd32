//! # Subscription registry: the shared mutable state of the messenger.
//!
//! An insertion-ordered table of [`Subscription`]s behind one mutex.
//! Registration order is preserved because it fixes the delivery order of a
//! single broadcast to independent receivers; it carries no other meaning.
//!
//! ## Rules
//! - Every operation takes the lock for the duration of one table walk at
//!   most; the lock is **never** held while user code runs. Dispatch works
//!   from a [`Registry::snapshot`] taken under the lock and released before
//!   any callback, which is what makes self-unregistration from inside a
//!   callback deadlock-free.
//! - Removal is idempotent: removing what is not there is a no-op.
//! - Dead receivers stay in the table until [`Registry::purge_dead`] or an
//!   explicit removal; death only makes an entry non-deliverable (the
//!   dispatch path re-checks liveness independently).
//! - Lock poisoning is absorbed: no callback ever runs under the lock, so a
//!   panic elsewhere cannot leave the table mid-mutation.

use std::any::TypeId;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::messages::Token;

use super::subscription::{ReceiverId, Subscription};

/// Insertion-ordered subscription table.
pub(crate) struct Registry {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    fn table(&self) -> MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a subscription. Purely additive: duplicates are kept.
    pub(crate) fn insert(&self, subscription: Subscription) {
        self.table().push(subscription);
    }

    /// Copies the current table for dispatch, isolated from concurrent
    /// mutation. The lock is released when this returns.
    pub(crate) fn snapshot(&self) -> Vec<Subscription> {
        self.table().clone()
    }

    /// Removes every subscription held by the given receiver identity,
    /// across all types and tokens.
    pub(crate) fn remove_receiver(&self, receiver: ReceiverId) {
        self.table().retain(|s| s.receiver.id() != receiver);
    }

    /// Removes subscriptions of one receiver and type. An empty token
    /// removes all tokens of that type; otherwise only the exact token.
    pub(crate) fn remove_message(&self, receiver: ReceiverId, type_id: TypeId, token: &Token) {
        self.table().retain(|s| {
            !(s.receiver.id() == receiver
                && s.type_id == type_id
                && (token.is_empty() || s.token == *token))
        });
    }

    /// Drops every entry whose receiver has died. Reclamation only: dispatch
    /// correctness never depends on this having run.
    pub(crate) fn purge_dead(&self) {
        self.table().retain(|s| s.receiver.is_alive());
    }

    pub(crate) fn len(&self) -> usize {
        self.table().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contexts::{ContextId, Executor, Job, Receiver};
    use crate::core::subscription::WeakReceiver;
    use std::sync::Arc;

    /// Executor that swallows jobs; registry tests never deliver.
    struct NullExecutor {
        id: ContextId,
    }

    impl Executor for NullExecutor {
        fn context_id(&self) -> ContextId {
            self.id
        }
        fn post(&self, _job: Job) {}
    }

    struct Dummy {
        executor: Arc<NullExecutor>,
    }

    impl Dummy {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                executor: Arc::new(NullExecutor {
                    id: ContextId::next(),
                }),
            })
        }
    }

    impl Receiver for Dummy {
        fn executor(&self) -> Arc<dyn Executor> {
            Arc::clone(&self.executor) as Arc<dyn Executor>
        }
    }

    fn entry(receiver: &Arc<Dummy>, type_id: TypeId, token: Token) -> Subscription {
        Subscription {
            type_id,
            token,
            receiver: WeakReceiver::track(receiver),
            callback: Arc::new(|_| {}),
        }
    }

    struct Ping;
    struct Pong;

    #[test]
    fn test_insert_keeps_duplicates() {
        let registry = Registry::new();
        let r = Dummy::new();
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::none()));
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::none()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_receiver_is_idempotent() {
        let registry = Registry::new();
        let r = Dummy::new();
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::none()));
        registry.insert(entry(&r, TypeId::of::<Pong>(), Token::new("t")));

        registry.remove_receiver(ReceiverId::of(&r));
        assert_eq!(registry.len(), 0);
        registry.remove_receiver(ReceiverId::of(&r));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_remove_receiver_leaves_others() {
        let registry = Registry::new();
        let a = Dummy::new();
        let b = Dummy::new();
        registry.insert(entry(&a, TypeId::of::<Ping>(), Token::none()));
        registry.insert(entry(&b, TypeId::of::<Ping>(), Token::none()));

        registry.remove_receiver(ReceiverId::of(&a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_message_exact_token() {
        let registry = Registry::new();
        let r = Dummy::new();
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::new("one")));
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::new("two")));

        registry.remove_message(ReceiverId::of(&r), TypeId::of::<Ping>(), &Token::new("one"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_message_empty_token_removes_all_tokens() {
        let registry = Registry::new();
        let r = Dummy::new();
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::new("one")));
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::new("two")));
        registry.insert(entry(&r, TypeId::of::<Pong>(), Token::new("one")));

        registry.remove_message(ReceiverId::of(&r), TypeId::of::<Ping>(), &Token::none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_purge_dead_drops_only_dead_entries() {
        let registry = Registry::new();
        let alive = Dummy::new();
        let doomed = Dummy::new();
        registry.insert(entry(&alive, TypeId::of::<Ping>(), Token::none()));
        registry.insert(entry(&doomed, TypeId::of::<Ping>(), Token::none()));

        drop(doomed);
        registry.purge_dead();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let registry = Registry::new();
        let r = Dummy::new();
        registry.insert(entry(&r, TypeId::of::<Ping>(), Token::none()));

        let snapshot = registry.snapshot();
        registry.remove_receiver(ReceiverId::of(&r));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 0);
    }
}
