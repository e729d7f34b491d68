//! Chat session coordinator.
//!
//! Owns the WebSocket connection and multiplexes two activities over it:
//! the outbound side (user commands) and the inbound side (decoded server
//! frames). One select loop drives both plus the heartbeat and the optional
//! session deadline, so the close decision is taken in exactly one place
//! regardless of which side triggers it. Once that decision is taken, no
//! further outbound sends are attempted.

pub mod input;

use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{interval_at, sleep_until, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use queuechat_core::protocol::envelope::{decode, encode, Envelope};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

use input::{Command, InputHandle};

/// Heartbeat cadence: ping the peer, then expect evidence of life.
const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_TIMEOUT: Duration = Duration::from_secs(10);
/// How long to wait for the peer's half of the close handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

type WsSink =
    futures_util::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
    Rejected,
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// User issued a quit command (or the input stream ended).
    Quit,
    /// The listen-seconds deadline elapsed.
    Deadline,
    /// The peer closed the connection.
    PeerClosed,
    /// The transport failed mid-session.
    Transport,
}

impl SessionEnd {
    pub fn describe(self) -> &'static str {
        match self {
            SessionEnd::Quit => "user quit",
            SessionEnd::Deadline => "listen-seconds limit reached",
            SessionEnd::PeerClosed => "server closed the connection",
            SessionEnd::Transport => "transport failure",
        }
    }
}

/// Open the chat connection for a granted ticket and run the duplex session
/// until it ends.
///
/// A connect-time rejection surfaces as [`ClientError::Rejected`] and is not
/// retried; admission already happened once. Everything after a successful
/// connect ends the session, not the process.
pub async fn run_session(
    config: &ClientConfig,
    ticket_id: &str,
    mut input: InputHandle,
) -> Result<SessionEnd> {
    let url = format!("{}/gameserver?ticketId={ticket_id}", config.chat_base_url);
    tracing::info!(%url, state = ?SessionState::Connecting, "opening chat connection");
    println!("[chat] connecting to {url}");

    let (socket, _response) = match connect_async(url.as_str()).await {
        Ok(ok) => ok,
        Err(tungstenite::Error::Http(response)) => {
            let code = response.status().as_u16();
            let reason = describe_rejection(code);
            tracing::warn!(code, state = ?SessionState::Rejected, "chat connection rejected");
            input.cancel();
            return Err(ClientError::Rejected {
                code,
                reason: reason.to_string(),
            });
        }
        Err(err) => {
            input.cancel();
            return Err(err.into());
        }
    };

    tracing::info!(state = ?SessionState::Active, "chat connection established");
    println!("[chat] connected; type /help for commands");

    let (mut sink, mut stream) = socket.split();

    let mut end = None;
    if !config.initial_message.is_empty() {
        let greeting = Envelope::MessageSend {
            message: config.initial_message.clone(),
        };
        match send_envelope(&mut sink, &greeting).await {
            Ok(()) => println!("[chat] sent: {}", config.initial_message),
            Err(err) => {
                eprintln!("[chat] initial send failed: {err}");
                end = Some(SessionEnd::Transport);
            }
        }
    }

    let deadline = (config.listen_seconds > 0)
        .then(|| Instant::now() + Duration::from_secs(config.listen_seconds));
    let mut ping_tick = interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pong_deadline: Option<Instant> = None;

    while end.is_none() {
        let liveness = async move {
            match pong_deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        let session_deadline = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = input.recv() => {
                end = handle_command(&mut sink, command).await;
            }

            incoming = stream.next() => {
                // Any inbound traffic is evidence of a live peer.
                pong_deadline = None;
                end = handle_incoming(&mut sink, incoming).await;
            }

            _ = ping_tick.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    end = Some(SessionEnd::Transport);
                } else if pong_deadline.is_none() {
                    pong_deadline = Some(Instant::now() + PONG_TIMEOUT);
                }
            }

            _ = liveness => {
                eprintln!("[chat] no heartbeat reply within {}s; closing", PONG_TIMEOUT.as_secs());
                end = Some(SessionEnd::Transport);
            }

            _ = session_deadline => {
                println!("[chat] listen-seconds limit reached; closing the connection");
                end = Some(SessionEnd::Deadline);
            }
        }
    }

    let end = end.unwrap_or(SessionEnd::Transport);
    tracing::debug!(state = ?SessionState::Closing, reason = ?end, "shutting down chat session");

    // Close is idempotent from either side: the peer may already be gone,
    // in which case the frame send simply fails and the drain is a no-op.
    let _ = sink.send(Message::Close(None)).await;
    input.cancel();
    drain_close(&mut stream).await;

    tracing::info!(state = ?SessionState::Closed, "chat session finished");
    Ok(end)
}

/// Outbound activity step. Returns the session end once one is decided.
async fn handle_command(sink: &mut WsSink, command: Option<Command>) -> Option<SessionEnd> {
    match command {
        Some(Command::Quit) | None => {
            println!("[chat] quit received; closing the connection");
            Some(SessionEnd::Quit)
        }
        Some(Command::Help) => {
            println!("commands: /help | /quit (also :q, /exit) | /stats; any other text is sent to the room");
            None
        }
        Some(Command::Stats) => {
            match send_envelope(sink, &Envelope::ServerStatusRequest {}).await {
                Ok(()) => {
                    println!("[chat] server status requested");
                    None
                }
                Err(err) => {
                    eprintln!("[chat] status request failed: {err}");
                    Some(SessionEnd::Transport)
                }
            }
        }
        Some(Command::Say(text)) => match send_envelope(sink, &Envelope::MessageSend {
            message: text,
        })
        .await
        {
            Ok(()) => None,
            Err(err) => {
                eprintln!("[chat] send failed: {err}");
                Some(SessionEnd::Transport)
            }
        },
    }
}

/// Inbound activity step. Decode failures degrade to raw display and never
/// end the session; only transport conditions do.
async fn handle_incoming(
    sink: &mut WsSink,
    incoming: Option<tungstenite::Result<Message>>,
) -> Option<SessionEnd> {
    match incoming {
        Some(Ok(Message::Text(text))) => {
            println!("[chat] {}", decode(&text).render());
            None
        }
        Some(Ok(Message::Ping(payload))) => {
            if sink.send(Message::Pong(payload)).await.is_err() {
                Some(SessionEnd::Transport)
            } else {
                None
            }
        }
        Some(Ok(Message::Pong(_))) => None,
        Some(Ok(Message::Close(frame))) => {
            report_peer_close(frame.as_ref());
            Some(SessionEnd::PeerClosed)
        }
        // Binary frames are not part of this protocol; ignore them.
        Some(Ok(_)) => None,
        Some(Err(err)) => {
            eprintln!("[chat] connection error: {err}");
            Some(SessionEnd::Transport)
        }
        None => {
            println!("[chat] server closed the connection");
            Some(SessionEnd::PeerClosed)
        }
    }
}

async fn send_envelope(sink: &mut WsSink, envelope: &Envelope) -> Result<()> {
    let wire = encode(envelope)?;
    sink.send(Message::Text(wire)).await?;
    Ok(())
}

/// A normal peer close is informational; an abnormal one carries its code
/// to stderr. Neither is a process-level fault.
fn report_peer_close(frame: Option<&CloseFrame<'_>>) {
    match frame {
        Some(frame) if frame.code != CloseCode::Normal => {
            eprintln!("[chat] connection closed abnormally (code={})", frame.code);
        }
        _ => println!("[chat] server closed the connection"),
    }
}

/// Wait briefly for the peer's half of the close handshake so the shutdown
/// is clean on the wire. Times out silently; the connection drops either way.
async fn drain_close(stream: &mut (impl Stream<Item = tungstenite::Result<Message>> + Unpin)) {
    while let Ok(Some(next)) = timeout(CLOSE_GRACE, stream.next()).await {
        match next {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

fn describe_rejection(code: u16) -> &'static str {
    match code {
        401 => "invalid ticket",
        409 => "another session is already connected with this ticket",
        _ => "server refused the connection",
    }
}
