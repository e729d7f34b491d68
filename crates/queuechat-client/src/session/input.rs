//! Interactive command input (the outbound activity's source).

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send chat text.
    Say(String),
    /// Ask the server for its connected-client count.
    Stats,
    /// Print the command list locally; no network effect.
    Help,
    /// End the session.
    Quit,
}

/// Parse one input line. Blank lines produce no command.
pub fn parse_line(raw: &str) -> Option<Command> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if matches!(
        text.to_ascii_lowercase().as_str(),
        "/quit" | ":q" | "/exit"
    ) {
        return Some(Command::Quit);
    }
    match text {
        "/help" => Some(Command::Help),
        "/stats" => Some(Command::Stats),
        _ => Some(Command::Say(text.to_string())),
    }
}

/// Handle to the outbound input activity: the command stream plus the task
/// producing it, so the session can discard an in-flight read on shutdown.
pub struct InputHandle {
    commands: mpsc::Receiver<Command>,
    task: Option<JoinHandle<()>>,
}

impl InputHandle {
    /// Read interactive commands from stdin, one line at a time.
    ///
    /// The reader runs as its own task so a pending line read never blocks
    /// the inbound activity. EOF and read failures end the stream like a
    /// quit command.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let Some(command) = parse_line(&line) else {
                            continue;
                        };
                        let quit = command == Command::Quit;
                        if tx.send(command).await.is_err() || quit {
                            break;
                        }
                    }
                    Ok(None) => {
                        let _ = tx.send(Command::Quit).await;
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(%err, "stdin read failed; ending input");
                        let _ = tx.send(Command::Quit).await;
                        break;
                    }
                }
            }
        });
        Self {
            commands: rx,
            task: Some(task),
        }
    }

    /// Feed commands from a channel instead of stdin.
    pub fn scripted(commands: mpsc::Receiver<Command>) -> Self {
        Self {
            commands,
            task: None,
        }
    }

    pub(crate) async fn recv(&mut self) -> Option<Command> {
        self.commands.recv().await
    }

    /// Cancel the producing task, discarding any in-flight read.
    pub(crate) fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
