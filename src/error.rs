//! Error types used by the herald messenger.
//!
//! Almost nothing in the public API can fail: registration, unregistration,
//! cleanup and sending are all infallible by design (misuse degrades to a
//! silent no-op, never an error surfaced to the sender). The one typed
//! failure is [`EnvelopeError`], returned by the checked unpack of a
//! type-erased [`Envelope`](crate::Envelope).

use thiserror::Error;

/// Failure to extract a typed value out of an [`Envelope`](crate::Envelope).
///
/// The dispatcher pairs each subscription's stored type tag with its
/// callback's expected type at registration time, so this error is
/// unreachable through normal delivery. Reaching it means the pairing
/// invariant was broken somewhere inside the crate.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The envelope's stored type tag does not match the requested type.
    #[error("envelope holds `{actual}`, caller expected `{expected}`")]
    TypeMismatch {
        /// Type name the caller asked for.
        expected: &'static str,
        /// Type name the envelope was packed with.
        actual: &'static str,
    },
}

impl EnvelopeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use herald::EnvelopeError;
    ///
    /// let err = EnvelopeError::TypeMismatch { expected: "Ping", actual: "Pong" };
    /// assert_eq!(err.as_label(), "envelope_type_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EnvelopeError::TypeMismatch { .. } => "envelope_type_mismatch",
        }
    }
}
