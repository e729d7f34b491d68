//! Shared error type across queuechat crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Wire-level error surface of the core crate.
///
/// Decoding never produces one of these; only producing a frame can fail,
/// and only through the serializer.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("envelope encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}
