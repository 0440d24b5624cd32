//! Messenger core: subscription state and the dispatch engine.
//!
//! The only public API from this module is [`Messenger`]. Internal modules:
//! - [`subscription`]: subscription records, receiver identity, weak
//!   receiver tracking;
//! - [`registry`]: the insertion-ordered, mutex-guarded subscription table;
//! - [`messenger`]: the public operations and the delivery protocol.
//!
//! ## Wiring
//! ```text
//!              Messenger (clonable handle)
//!                  │
//!                  ▼
//!              Registry ──── Mutex<Vec<Subscription>>
//!                  │                   │
//!        snapshot()│           WeakReceiver (liveness, identity)
//!                  ▼                   │
//!            dispatch loop ────────────┘
//!               │        │
//!        inline │        │ deferred
//!               ▼        ▼
//!          callback   Executor::post ─► receiver's context runs callback
//! ```

mod messenger;
mod registry;
mod subscription;

pub use messenger::Messenger;
