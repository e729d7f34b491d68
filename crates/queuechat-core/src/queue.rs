//! Queue admission wire model.
//!
//! Shapes exchanged with the admission HTTP API: the entry request body and
//! the status snapshot returned by both endpoints. Parsing is tolerant by
//! contract — servers disagree on rank types and ticket key casing, and a
//! malformed field must not fail a poll attempt.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Body of `POST /api/queue/entry`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub user_id: String,
    pub nickname: String,
    pub region: String,
    pub signature: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

/// Status codes that mean "ready" even without a ticket id. Servers may
/// signal promotion either way.
const PROMOTED_CODES: [&str; 3] = ["PROMOTED", "READY", "GRANTED"];

/// One queue admission snapshot, built fresh from each response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatus {
    /// Server-defined status code, normalized to uppercase.
    pub status: String,
    /// Position in the queue. Zero is a valid rank; absent or unparsable
    /// ranks are `None` ("unknown").
    pub rank: Option<u64>,
    /// Opaque admission ticket, when granted.
    pub ticket_id: Option<String>,
}

impl QueueStatus {
    /// Build from an arbitrary response body.
    pub fn from_value(value: &Value) -> Self {
        let obj = value.as_object();
        let status = obj
            .and_then(|m| m.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_uppercase();
        let rank = obj.and_then(|m| m.get("rank")).and_then(parse_rank);
        let ticket_id = obj
            .and_then(|m| m.get("ticketId").or_else(|| m.get("ticket_id")))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        Self {
            status,
            rank,
            ticket_id,
        }
    }

    /// Whether this client may open a chat session.
    pub fn is_promoted(&self) -> bool {
        self.ticket_id.is_some() || PROMOTED_CODES.contains(&self.status.as_str())
    }
}

fn parse_rank(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
