//! queuechat client library entry.
//!
//! This crate wires configuration resolution, the queue admission poller,
//! and the chat session coordinator into the flow consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod queue;
pub mod session;
