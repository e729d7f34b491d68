//! Chat wire protocol (JSON text envelopes).
//!
//! One frame per WebSocket text message, no batching. The parser is
//! panic-free and total: anything that does not match a known envelope is
//! reported as a displayable fallback, never as an error.

pub mod envelope;
