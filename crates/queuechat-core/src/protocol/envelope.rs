//! Chat envelope codec.
//!
//! Every frame is `{"type": <tag>, "payload": {...}}` with a closed set of
//! type tags. Inbound parsing degrades instead of failing: valid JSON that
//! is not a complete known envelope becomes [`Decoded::Unrecognized`], and
//! non-JSON text passes through verbatim as [`Decoded::Raw`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Closed set of wire message kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Envelope {
    /// Client -> server chat text.
    #[serde(rename = "MESSAGE_SEND")]
    MessageSend { message: String },

    /// Server -> client broadcast chat line.
    #[serde(rename = "MESSAGE_RECEIVE")]
    MessageReceive {
        message: String,
        #[serde(default = "unknown_nickname")]
        nickname: String,
        #[serde(default)]
        timestamp: String,
    },

    /// Client -> server connected-count probe (empty payload).
    #[serde(rename = "SERVERSTATUS_REQUEST")]
    ServerStatusRequest {},

    /// Server -> client connected-count answer.
    #[serde(rename = "SERVERSTATUS_RESPONSE")]
    ServerStatusResponse {
        #[serde(rename = "clientCount")]
        client_count: u64,
    },

    /// Server -> client operational notice.
    #[serde(rename = "SYSTEM_MESSAGE_RECEIVE")]
    SystemMessageReceive {
        message: String,
        #[serde(default)]
        timestamp: String,
    },
}

fn unknown_nickname() -> String {
    "unknown".to_string()
}

/// Serialize one envelope to its single-line wire form.
pub fn encode(envelope: &Envelope) -> Result<String> {
    Ok(serde_json::to_string(envelope)?)
}

/// Result of decoding one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A complete, recognized envelope.
    Frame(Envelope),
    /// Valid JSON object, but an unknown tag or an incomplete payload.
    Unrecognized(Value),
    /// Not a JSON object; displayed verbatim.
    Raw(String),
}

/// Decode one inbound frame. Total: never an error.
pub fn decode(text: &str) -> Decoded {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => return Decoded::Raw(text.to_string()),
    };
    if !value.is_object() {
        return Decoded::Raw(text.to_string());
    }
    match Envelope::deserialize(&value) {
        Ok(envelope) => Decoded::Frame(envelope),
        Err(err) => {
            tracing::debug!(%err, "inbound frame did not match a known envelope");
            Decoded::Unrecognized(value)
        }
    }
}

impl Decoded {
    /// Display line for the inbound side of a session.
    pub fn render(&self) -> String {
        match self {
            Decoded::Frame(Envelope::MessageReceive {
                message,
                nickname,
                timestamp,
            }) => {
                if timestamp.is_empty() {
                    format!("{nickname}: {message}")
                } else {
                    format!("{nickname}@{timestamp}: {message}")
                }
            }
            Decoded::Frame(Envelope::ServerStatusResponse { client_count }) => {
                format!("[server] {client_count} client(s) connected")
            }
            Decoded::Frame(Envelope::SystemMessageReceive { message, timestamp }) => {
                if timestamp.is_empty() {
                    format!("[system] {message}")
                } else {
                    format!("[system@{timestamp}] {message}")
                }
            }
            // Recognized but not meant for display (e.g. an echoed
            // client->server frame): fall back to its wire form.
            Decoded::Frame(other) => serde_json::to_string(other).unwrap_or_default(),
            Decoded::Unrecognized(value) => value.to_string(),
            Decoded::Raw(text) => text.clone(),
        }
    }
}
