use airdrop_backend::{eligibility::Eligibility, server, state::StateConfig, telemetry};
use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    telemetry::init();

    let config = StateConfig::from_file(&StateConfig::path())?;
    let allowlist = config
        .load_allowlist()
        .context("Failed to load allowlist")?;
    let eligibility =
        Arc::new(Eligibility::new(allowlist).context("Failed to build merkle tree")?);
    info!(
        "Loaded {} allowlist entries, merkle root {}",
        eligibility.allowlist().len(),
        eligibility.root()
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on {}", config.listen_addr);

    axum::serve(listener, server::app(eligibility))
        .await
        .context("Server error")?;
    Ok(())
}
