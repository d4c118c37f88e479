//! Wallet ledger server binary

use wallet_ledger::{Config, WalletLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting wallet ledger server");

    // Load configuration
    let config = Config::from_env()?;

    // Open ledger
    let ledger = WalletLedger::open(config).await?;
    tracing::info!("Wallet ledger opened successfully");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down wallet ledger server");
    ledger.shutdown().await?;

    Ok(())
}
