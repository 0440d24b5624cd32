//! Message data model: typed payloads, type erasure, and topic tokens.
//!
//! ## Contents
//! - [`Message`] marker trait for sendable values
//! - [`Envelope`] type-erased payload with a checked unpack
//! - [`Token`] optional topic qualifier with wildcard matching
//!
//! See `core/mod.rs` for how these flow through registration and dispatch.

mod envelope;
mod token;

pub use envelope::{Envelope, Message};
pub use token::Token;
