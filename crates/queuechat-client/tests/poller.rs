//! Admission poller tests against a scripted queue api.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use queuechat_client::config::{CliArgs, ClientConfig};
use queuechat_client::error::{ClientError, Result};
use queuechat_client::queue::{poller, QueueApi};
use queuechat_core::queue::{EntryRequest, QueueStatus};

fn fast_config(max_polls: u32) -> ClientConfig {
    let mut config = ClientConfig::resolve(CliArgs {
        queue_base_url: "http://localhost:8080".to_string(),
        chat_base_url: "ws://localhost:8081".to_string(),
        user_id: Some("user-abc123".to_string()),
        nickname: None,
        region: "global".to_string(),
        signing_secret: "local-dev-secret".to_string(),
        meta: Vec::new(),
        poll_interval: 2.0,
        max_polls,
        skip_chat: true,
        message: String::new(),
        listen_seconds: 0,
    })
    .unwrap();
    config.poll_interval = Duration::from_millis(2);
    config
}

fn waiting(rank: u64) -> QueueStatus {
    QueueStatus {
        status: "WAITING".to_string(),
        rank: Some(rank),
        ticket_id: None,
    }
}

fn promoted(ticket: &str) -> QueueStatus {
    QueueStatus {
        status: "PROMOTED".to_string(),
        rank: Some(0),
        ticket_id: Some(ticket.to_string()),
    }
}

/// Scripted queue api: one canned entry response plus an ordered status
/// script; records what the poller actually did.
struct ScriptedQueue {
    entry: QueueStatus,
    script: Mutex<VecDeque<Result<QueueStatus>>>,
    status_calls: AtomicU32,
    seen_entry: Mutex<Option<EntryRequest>>,
}

impl ScriptedQueue {
    fn new(entry: QueueStatus, script: Vec<Result<QueueStatus>>) -> Self {
        Self {
            entry,
            script: Mutex::new(script.into()),
            status_calls: AtomicU32::new(0),
            seen_entry: Mutex::new(None),
        }
    }

    fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueApi for ScriptedQueue {
    async fn enter(&self, entry: &EntryRequest) -> Result<QueueStatus> {
        *self.seen_entry.lock().unwrap() = Some(entry.clone());
        Ok(self.entry.clone())
    }

    async fn status(&self, _user_id: &str) -> Result<QueueStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(waiting(1)))
    }
}

#[tokio::test]
async fn exhaustion_after_exactly_max_polls() {
    let api = ScriptedQueue::new(
        waiting(10),
        vec![Ok(waiting(10)), Ok(waiting(9)), Ok(waiting(8))],
    );
    let config = fast_config(3);

    let ticket = poller::acquire_ticket(&api, &config).await.unwrap();
    assert_eq!(ticket, None);
    assert_eq!(api.status_calls(), 3);
}

#[tokio::test]
async fn entry_ticket_short_circuits_polling() {
    let api = ScriptedQueue::new(promoted("t-0"), Vec::new());
    let config = fast_config(3);

    let ticket = poller::acquire_ticket(&api, &config).await.unwrap();
    assert_eq!(ticket.as_deref(), Some("t-0"));
    assert_eq!(api.status_calls(), 0);
}

#[tokio::test]
async fn entry_request_carries_the_resolved_identity() {
    let api = ScriptedQueue::new(promoted("t-0"), Vec::new());
    let config = fast_config(3);

    poller::acquire_ticket(&api, &config).await.unwrap();
    let entry = api.seen_entry.lock().unwrap().clone().unwrap();
    assert_eq!(entry.user_id, config.user_id);
    assert_eq!(entry.nickname, config.nickname);
    assert_eq!(entry.region, "global");
    assert_eq!(entry.signature, config.signature);
}

#[tokio::test]
async fn failed_attempt_is_skipped_not_fatal() {
    let api = ScriptedQueue::new(
        waiting(10),
        vec![
            Err(ClientError::Config("scripted transport failure".into())),
            Ok(waiting(5)),
            Ok(promoted("t-1")),
        ],
    );
    let config = fast_config(5);

    let ticket = poller::acquire_ticket(&api, &config).await.unwrap();
    assert_eq!(ticket.as_deref(), Some("t-1"));
    assert_eq!(api.status_calls(), 3);
}

#[tokio::test]
async fn failed_attempts_still_consume_the_budget() {
    let api = ScriptedQueue::new(
        waiting(10),
        vec![
            Err(ClientError::Config("scripted failure".into())),
            Err(ClientError::Config("scripted failure".into())),
            Err(ClientError::Config("scripted failure".into())),
        ],
    );
    let config = fast_config(3);

    let ticket = poller::acquire_ticket(&api, &config).await.unwrap();
    assert_eq!(ticket, None);
    assert_eq!(api.status_calls(), 3);
}

#[tokio::test]
async fn promoted_status_without_ticket_stops_polling() {
    let readiness = QueueStatus {
        status: "READY".to_string(),
        rank: None,
        ticket_id: None,
    };
    let api = ScriptedQueue::new(waiting(10), vec![Ok(readiness)]);
    let config = fast_config(10);

    // Promotion is accepted either way; without a ticket id there is
    // nothing to hand to the chat phase.
    let ticket = poller::acquire_ticket(&api, &config).await.unwrap();
    assert_eq!(ticket, None);
    assert_eq!(api.status_calls(), 1);
}
