//! Casedesk daemon - assignment & SLA policy engine host.
//!
//! Owns the roster, cases, and loads in memory and serves them over a
//! Unix socket. Pass `--seed` to start with the demo fixture.

use anyhow::Result;
use casedesk_shared::config::{PolicyConfig, CONFIG_PATH};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use casedeskd::rpc_server;
use casedeskd::scheduler;
use casedeskd::seed;
use casedeskd::state::DaemonStateInner;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("casedeskd v{} starting", casedesk_shared::VERSION);

    let config = PolicyConfig::load_or_default(Path::new(CONFIG_PATH));
    let mut inner = DaemonStateInner::new(config);

    if std::env::args().any(|arg| arg == "--seed") {
        seed::seed_demo(&mut inner);
    }

    let state = inner.shared();

    tokio::spawn(scheduler::run_reset_scheduler(state.clone()));

    let server = tokio::spawn(rpc_server::start_server(state));

    tokio::select! {
        result = server => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down gracefully");
        }
    }

    Ok(())
}
