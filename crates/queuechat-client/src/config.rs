//! Client configuration: CLI flags plus environment, resolved once.
//!
//! Everything below this module is a pure function of the resolved
//! [`ClientConfig`]; no queue or session code reads the environment.

use std::collections::BTreeMap;
use std::time::Duration;

use clap::Parser;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::error::{ClientError, Result};

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_POLL_INTERVAL_SECS: f64 = 2.0;
const DEFAULT_MAX_POLLS: u32 = 60;

/// Command-line options, pre-resolution.
#[derive(Debug, Parser)]
#[command(
    name = "queuechat",
    about = "Reference client for the queue admission API and chat server"
)]
pub struct CliArgs {
    /// Queue admission API base URL.
    #[arg(long, env = "QUEUE_API_BASE_URL", default_value = "http://localhost:8080")]
    pub queue_base_url: String,

    /// Chat server base URL.
    #[arg(long, env = "CHAT_SERVER_BASE_URL", default_value = "ws://localhost:8081")]
    pub chat_base_url: String,

    /// Explicit userId (random when omitted).
    #[arg(long)]
    pub user_id: Option<String>,

    /// Chat nickname (derived from the userId when omitted).
    #[arg(long)]
    pub nickname: Option<String>,

    /// Region field forwarded on queue entry.
    #[arg(long, default_value = "global")]
    pub region: String,

    /// Shared secret used to sign the userId.
    #[arg(long, env = "QUEUE_SIGNING_SECRET", default_value = "local-dev-secret")]
    pub signing_secret: String,

    /// Extra metadata forwarded on queue entry (repeatable).
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,

    /// Seconds between status polls.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: f64,

    /// Maximum number of status polls before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_POLLS)]
    pub max_polls: u32,

    /// Stop after ticket acquisition; do not open the chat session.
    #[arg(long)]
    pub skip_chat: bool,

    /// Message sent immediately after the chat connection opens.
    #[arg(long, default_value = "")]
    pub message: String,

    /// Force-close the session after this many seconds (0 = until /quit).
    #[arg(long, default_value_t = 0)]
    pub listen_seconds: u64,
}

/// Fully-resolved immutable run configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub queue_base_url: String,
    pub chat_base_url: String,
    pub user_id: String,
    pub nickname: String,
    pub region: String,
    /// HMAC-SHA256 over the userId keyed by the signing secret, hex-encoded.
    pub signature: String,
    pub meta: BTreeMap<String, String>,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub skip_chat: bool,
    pub initial_message: String,
    /// 0 means unbounded.
    pub listen_seconds: u64,
}

impl ClientConfig {
    /// Resolve and validate the run configuration once, at startup.
    pub fn resolve(args: CliArgs) -> Result<Self> {
        let user_id = match args.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => random_user_id(),
        };
        let nickname = match args.nickname.as_deref().map(str::trim) {
            Some(nick) if !nick.is_empty() => nick.to_string(),
            _ => default_nickname(&user_id),
        };
        let signature = sign_user_id(&user_id, &args.signing_secret)?;

        let config = Self {
            queue_base_url: strip_trailing_slashes(&args.queue_base_url),
            chat_base_url: strip_trailing_slashes(&args.chat_base_url),
            user_id,
            nickname,
            region: args.region,
            signature,
            meta: parse_meta(&args.meta),
            poll_interval: normalize_poll_interval(args.poll_interval),
            max_polls: if args.max_polls == 0 {
                DEFAULT_MAX_POLLS
            } else {
                args.max_polls
            },
            skip_chat: args.skip_chat,
            initial_message: args.message.trim().to_string(),
            listen_seconds: args.listen_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.queue_base_url.is_empty() {
            return Err(ClientError::Config(
                "queue base url must not be empty".into(),
            ));
        }
        if self.chat_base_url.is_empty() {
            return Err(ClientError::Config("chat base url must not be empty".into()));
        }
        Ok(())
    }
}

fn sign_user_id(user_id: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ClientError::Config(format!("signing secret rejected: {e}")))?;
    mac.update(user_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_user_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("user-{suffix}")
}

fn default_nickname(user_id: &str) -> String {
    let chars: Vec<char> = user_id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("ranger-{tail}")
}

fn strip_trailing_slashes(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_meta(pairs: &[String]) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), value.to_string());
    }
    meta
}

fn normalize_poll_interval(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::from_secs_f64(DEFAULT_POLL_INTERVAL_SECS)
    }
}
