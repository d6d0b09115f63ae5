mod bootstrap;
mod chain;
mod clients;
mod config;
mod error;
mod models;
mod runner;
mod watcher;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,caravan=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("🚀 Starting caravan contract reconciliation service");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration error: {}. Gracefully exiting.", e);
            return Err(e.into());
        }
    };

    let mut runner = match bootstrap::build_runner(&config).await {
        Ok(runner) => runner,
        Err(e) => {
            error!("❌ Startup failed: {}. Gracefully exiting.", e);
            return Err(e.into());
        }
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Shutdown signal received; stopping after the current batch");
        signal_token.cancel();
    });

    runner.run(shutdown).await;
    info!("👋 Caravan exited in {:?} state", runner.state());
    Ok(())
}
