use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::EnvFilter;

/// Local stand-in for the board backend.
#[derive(Parser, Debug)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// Start with sample posts and the `test-token` credential.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let addr = format!("127.0.0.1:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    let store = if args.seed {
        mock_server::seeded_store()
    } else {
        mock_server::Store::default()
    };
    mock_server::run_with(listener, Arc::new(RwLock::new(store)))
        .await
        .context("serve mock api")
}
