//! Client-side error surface.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for the admission and chat flows.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("queue api request failed: {0}")]
    Queue(#[from] reqwest::Error),
    #[error("websocket failure: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection rejected (status={code}): {reason}")]
    Rejected { code: u16, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Protocol(#[from] queuechat_core::ProtocolError),
}
