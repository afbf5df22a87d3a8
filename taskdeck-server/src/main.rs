//! TaskDeck task server -- HTTP/JSON API over a document-style task store.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 0.0.0.0:3000
//! cargo run --bin taskdeck-server
//!
//! # Run on a custom address with an explicit snapshot file
//! cargo run --bin taskdeck-server -- --bind 127.0.0.1:8080 --snapshot-path ./tasks.json
//!
//! # Or via environment variable
//! TASKDECK_ADDR=127.0.0.1:8080 cargo run --bin taskdeck-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskdeck_server::api::{self, ApiState};
use taskdeck_server::config::{ServerCliArgs, ServerConfig};
use taskdeck_server::repo::TaskRepo;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskdeck server");

    let repo = match &config.snapshot_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "snapshot persistence enabled");
            TaskRepo::open(path.clone())
        }
        None => TaskRepo::in_memory(),
    };
    let state = Arc::new(ApiState::new(repo));

    match api::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task server");
            std::process::exit(1);
        }
    }
}
