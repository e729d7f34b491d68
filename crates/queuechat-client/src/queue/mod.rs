//! Queue admission: the HTTP api seam, the bounded poller, and the
//! wait-progress display.

pub mod poller;
pub mod report;

use std::time::Duration;

use async_trait::async_trait;

use queuechat_core::queue::{EntryRequest, QueueStatus};

use crate::error::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Boundary to the queue admission service. The poller is written against
/// this trait so tests can script promotion sequences without a server.
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// `POST /api/queue/entry`.
    async fn enter(&self, entry: &EntryRequest) -> Result<QueueStatus>;
    /// `GET /api/queue/status?userId=...`.
    async fn status(&self, user_id: &str) -> Result<QueueStatus>;
}

/// reqwest-backed queue api client.
pub struct HttpQueueApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpQueueApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

#[async_trait]
impl QueueApi for HttpQueueApi {
    async fn enter(&self, entry: &EntryRequest) -> Result<QueueStatus> {
        let body: serde_json::Value = self
            .http
            .post(format!("{}/api/queue/entry", self.base_url))
            .json(entry)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(QueueStatus::from_value(&body))
    }

    async fn status(&self, user_id: &str) -> Result<QueueStatus> {
        let body: serde_json::Value = self
            .http
            .get(format!("{}/api/queue/status", self.base_url))
            .query(&[("userId", user_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(QueueStatus::from_value(&body))
    }
}
