//! Bounded admission polling loop.

use tokio::time::sleep;

use queuechat_core::queue::{EntryRequest, QueueStatus};

use crate::config::ClientConfig;
use crate::error::Result;

use super::report::QueueWaitDisplay;
use super::QueueApi;

/// Enter the queue and wait for promotion.
///
/// Returns the ticket id, or `None` when `max_polls` attempts pass without
/// promotion. A failed status call skips that attempt after the inter-poll
/// wait; it never aborts the wait on its own.
pub async fn acquire_ticket(
    api: &dyn QueueApi,
    config: &ClientConfig,
) -> Result<Option<String>> {
    println!("[queue] requesting entry for userId={}", config.user_id);
    let entry = EntryRequest {
        user_id: config.user_id.clone(),
        nickname: config.nickname.clone(),
        region: config.region.clone(),
        signature: config.signature.clone(),
        meta: config.meta.clone(),
    };
    let status = api.enter(&entry).await?;
    render_entry(&status);

    if let Some(ticket) = &status.ticket_id {
        return Ok(Some(ticket.clone()));
    }

    let mut display = QueueWaitDisplay::new();
    for attempt in 1..=config.max_polls {
        let status = match api.status(&config.user_id).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(%err, attempt, "status poll failed; retrying after wait");
                sleep(config.poll_interval).await;
                continue;
            }
        };

        display.emit(&status, attempt, config.max_polls);
        if status.is_promoted() {
            return Ok(status.ticket_id);
        }
        sleep(config.poll_interval).await;
    }

    Ok(None)
}

fn render_entry(status: &QueueStatus) {
    let rank = status
        .rank
        .map_or_else(|| "unknown".to_string(), |r| r.to_string());
    let ticket = status.ticket_id.as_deref().unwrap_or("-");
    println!(
        "[entry] status={} rank={rank} ticketId={ticket}",
        status.status
    );
}
