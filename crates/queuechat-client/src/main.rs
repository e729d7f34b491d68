//! queuechat binary entry.
//!
//! Resolves configuration once, then drives the admission + chat flow.
//! Ctrl-C interrupts the run and is reported without a fault dump.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use queuechat_client::app;
use queuechat_client::config::{CliArgs, ClientConfig};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = CliArgs::parse();
    let config = match ClientConfig::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    tokio::select! {
        result = app::run(&config) => {
            if let Err(err) = result {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupted by user");
        }
    }
}
