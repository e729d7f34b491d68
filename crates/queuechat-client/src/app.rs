//! End-to-end run flow: banner, queue admission, chat session.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::queue::{poller, HttpQueueApi};
use crate::session::{self, input::InputHandle};

/// Run the whole client flow for one resolved configuration.
pub async fn run(config: &ClientConfig) -> Result<()> {
    print_banner(config);

    let api = HttpQueueApi::new(config.queue_base_url.clone())?;
    let Some(ticket) = poller::acquire_ticket(&api, config).await? else {
        eprintln!("no ticket granted; check that the queue service is running and promoting clients");
        return Ok(());
    };

    if config.skip_chat {
        println!("--skip-chat set; stopping after ticket acquisition (ticketId={ticket})");
        return Ok(());
    }

    let input = InputHandle::stdin();
    let end = session::run_session(config, &ticket, input).await?;
    println!("[chat] session ended ({})", end.describe());
    Ok(())
}

fn print_banner(config: &ClientConfig) {
    println!("{}", "=".repeat(60));
    println!("queuechat client");
    println!(" - queue api   : {}", config.queue_base_url);
    println!(" - chat server : {}", config.chat_base_url);
    println!(" - user        : {} ({})", config.user_id, config.nickname);
    println!("{}", "=".repeat(60));
}
