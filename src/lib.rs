//! # herald
//!
//! **Herald** is an in-process, typed publish/subscribe messenger for Rust.
//!
//! Producers broadcast plain typed values; receivers register interest in a
//! message type, optionally scoped by a topic [`Token`]; the messenger
//! dispatches matching messages on each receiver's own execution context and
//! stays safe when a receiver is destroyed concurrently with dispatch.
//!
//! ## Architecture
//! ```text
//!   sender thread A          sender thread B        receiver's context
//!        │                        │                  (serial mailbox)
//!        │ send(msg)              │ send(msg)               │
//!        ▼                        ▼                         │
//! ┌───────────────────────────────────────────────┐         │
//! │  Messenger                                    │         │
//! │  - Registry (ordered subscription table)      │         │
//! │  - type + token matching                      │         │
//! │  - weak receiver liveness                     │         │
//! └──────┬───────────────────────────┬────────────┘         │
//!        │ same context:             │ different context:   │
//!        │ callback inline           │ post job ───────────►│ FIFO
//!        ▼                           ▼                      ▼
//!   user callback               mailbox queue          user callback
//! ```
//!
//! ## Delivery semantics
//! - A send matches a subscription when the message type is equal and the
//!   tokens match (either empty, or both the same string).
//! - A send issued while already running on the receiver's context invokes
//!   the callback inline, preserving send order on that context. Any other
//!   send is posted to the receiver's executor and runs later, FIFO per
//!   sender context.
//! - Receivers are held weakly. A dead receiver's subscriptions are skipped
//!   by every send and can be reclaimed with [`Messenger::cleanup`].
//! - Registration, unregistration, cleanup and sending are all safe to call
//!   concurrently from any thread, including from inside a delivery
//!   callback (a callback may unregister its own subscription).
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use herald::{Executor, MailboxExecutor, Messenger, Receiver};
//!
//! struct Tick { n: u64 }
//!
//! struct Clock { mailbox: Arc<MailboxExecutor> }
//!
//! impl Receiver for Clock {
//!     fn executor(&self) -> Arc<dyn Executor> {
//!         Arc::clone(&self.mailbox) as Arc<dyn Executor>
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let messenger = Messenger::new();
//!     let clock = Arc::new(Clock { mailbox: MailboxExecutor::new() });
//!
//!     messenger.register(&clock, |tick: &Tick| {
//!         println!("tick {}", tick.n);
//!     });
//!
//!     messenger.send(Tick { n: 1 });
//!     clock.mailbox.flush().await;
//! }
//! ```

mod contexts;
mod core;
mod error;
mod messages;

pub use contexts::{ContextGuard, ContextId, Executor, Job, MailboxExecutor, Receiver};
pub use core::Messenger;
pub use error::EnvelopeError;
pub use messages::{Envelope, Message, Token};
