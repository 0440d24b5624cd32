//! Subscription records and weak receiver tracking.

use std::any::TypeId;
use std::sync::{Arc, Weak};

use crate::contexts::Receiver;
use crate::messages::{Envelope, Token};

/// Type-erased delivery closure stored per subscription.
///
/// Built at registration by pairing the envelope unpack with the user
/// callback's expected type, which is what makes a tag mismatch at delivery
/// unreachable.
pub(crate) type DeliveryFn = Arc<dyn Fn(&Envelope) + Send + Sync>;

/// Identity of a receiver, independent of its liveness.
///
/// Captured from the `Arc`'s data address at registration; used to select
/// subscriptions for removal. Stable for the life of the allocation, which
/// is exactly as long as the registry can observe the receiver as alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReceiverId(usize);

impl ReceiverId {
    pub(crate) fn of<R: Receiver>(receiver: &Arc<R>) -> Self {
        Self(Arc::as_ptr(receiver) as *const () as usize)
    }
}

/// Non-owning handle to a subscription's receiver.
///
/// Holds a `Weak`, so the registry never extends the receiver's lifetime.
/// Liveness answers race benignly with destruction on other threads: "alive"
/// may be stale the instant it is returned, and the delivery path tolerates
/// that by upgrading again right before invoking the callback.
#[derive(Clone)]
pub(crate) struct WeakReceiver {
    id: ReceiverId,
    handle: Weak<dyn Receiver>,
}

impl WeakReceiver {
    pub(crate) fn track<R: Receiver>(receiver: &Arc<R>) -> Self {
        let id = ReceiverId::of(receiver);
        let strong = Arc::clone(receiver);
        let strong: Arc<dyn Receiver> = strong;
        Self {
            id,
            handle: Arc::downgrade(&strong),
        }
    }

    pub(crate) fn id(&self) -> ReceiverId {
        self.id
    }

    /// O(1) liveness probe; never takes ownership.
    pub(crate) fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    /// Takes a strong reference for the duration of one delivery, or `None`
    /// if the receiver is gone.
    pub(crate) fn upgrade(&self) -> Option<Arc<dyn Receiver>> {
        self.handle.upgrade()
    }
}

/// One registered interest: (type, token, receiver, callback).
///
/// Immutable once created; liveness is derived from the weak handle, not
/// stored. Duplicates with identical fields may coexist and each produces an
/// independent delivery.
#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) type_id: TypeId,
    pub(crate) token: Token,
    pub(crate) receiver: WeakReceiver,
    pub(crate) callback: DeliveryFn,
}

impl Subscription {
    /// Type and token matching for one send (liveness checked separately).
    pub(crate) fn accepts(&self, type_id: TypeId, token: &Token) -> bool {
        self.type_id == type_id && self.token.matches(token)
    }
}
