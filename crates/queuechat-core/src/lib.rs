//! queuechat core: transport-agnostic wire contracts and error types.
//!
//! This crate defines the chat envelope codec and the queue admission wire
//! model shared by the client. It intentionally carries no HTTP, WebSocket,
//! or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Inbound decoding is total: malformed server output degrades to a
//! displayable fallback instead of an error, so a session never drops on
//! unexpected traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod queue;

/// Shared result type.
pub use error::{ProtocolError, Result};
