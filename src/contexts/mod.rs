//! Execution contexts: identity, the executor contract, and receivers.
//!
//! This module is the seam that keeps the dispatcher testable: delivery only
//! ever compares [`ContextId`]s and posts [`Job`]s through the [`Executor`]
//! trait, so a real scheduler is never required by the core.
//!
//! ## Contents
//! - [`ContextId`], [`ContextGuard`] context identity and the thread-local
//!   "currently running" marker
//! - [`Executor`] the injectable execution-context contract
//! - [`Receiver`] subscription targets and their context association
//! - [`MailboxExecutor`] stock serial executor on a tokio worker task

mod context;
mod mailbox;
mod receiver;

pub use context::{ContextGuard, ContextId, Executor, Job};
pub use mailbox::MailboxExecutor;
pub use receiver::Receiver;
