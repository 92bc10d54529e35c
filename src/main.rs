//! SwapWatch entrypoint
//!
//! Wires the file-backed order store, the SideShift status provider, and
//! the logging notification sink into the order status monitor, then runs
//! until interrupted.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swapwatch::config::AppConfig;
use swapwatch::monitor::OrderMonitor;
use swapwatch::notify::LogSink;
use swapwatch::persistence::FileOrderStore;
use swapwatch::sideshift::SideShiftClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!("SwapWatch starting: {}", config.digest());

    let store = Arc::new(FileOrderStore::new(&config.persistence.data_dir)?);
    let provider = Arc::new(SideShiftClient::new(&config.provider));
    let monitor = OrderMonitor::new(config.monitor.clone(), provider, store, Arc::new(LogSink));

    monitor.load_pending_orders().await;
    monitor.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    monitor.stop();

    Ok(())
}
