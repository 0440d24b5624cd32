//! # Type-erased message container.
//!
//! [`Envelope`] is the uniform payload the dispatcher moves around: any
//! [`Message`] value packed together with its runtime type tag. Runtime type
//! identity comes from [`std::any::TypeId`], which is stable and injective
//! per type shape for the lifetime of the process; the messenger never
//! fabricates a tag itself.
//!
//! The value lives behind an `Arc`, so one send fans out to any number of
//! receivers without cloning the message itself, and deferred deliveries can
//! carry the envelope across contexts cheaply.
//!
//! Unpacking is checked: asking for the wrong type yields
//! [`EnvelopeError::TypeMismatch`](crate::EnvelopeError), never a miscast.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::EnvelopeError;

/// Marker for values that can travel through the messenger.
///
/// Blanket-implemented for every `Send + Sync + 'static` type; there is
/// nothing to implement by hand.
pub trait Message: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Message for T {}

/// A message value packed with its runtime type tag.
#[derive(Clone)]
pub struct Envelope {
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Envelope {
    /// Packs a typed value into an envelope, resolving its type tag.
    pub fn pack<M: Message>(value: M) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            value: Arc::new(value),
        }
    }

    /// The type tag the envelope was packed with.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable name of the packed type (diagnostics only).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if the envelope holds a value of type `M`.
    pub fn is<M: Message>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    /// Borrows the packed value as type `M`.
    ///
    /// Fails closed on a tag mismatch: the value is never reinterpreted as
    /// the wrong type.
    pub fn unpack<M: Message>(&self) -> Result<&M, EnvelopeError> {
        self.value
            .downcast_ref::<M>()
            .ok_or(EnvelopeError::TypeMismatch {
                expected: std::any::type_name::<M>(),
                actual: self.type_name,
            })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
