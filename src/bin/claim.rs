//! Claims the airdrop for the account behind the configured private key.

use airdrop_backend::{
    claim::{ClaimOutcome, ClaimSubmitter, WalletSigner},
    client::EligibilityClient,
    state::StateConfig,
    telemetry,
};
use alloy::{
    primitives::utils::format_units,
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    telemetry::init();

    let config = StateConfig::from_file(&StateConfig::path())?;
    let chain = config.chain()?;
    info!("chain {}", chain.name);

    let signer: PrivateKeySigner = chain.private_key.parse().context("Invalid private key")?;
    let account = signer.address();

    let client = EligibilityClient::new(&config.eligibility_url);
    let eligibility = client.check(account).await?;
    if !eligibility.eligible {
        info!("{} is not eligible for the airdrop", account);
        return Ok(());
    }

    let amount = eligibility
        .amount_value()?
        .context("Eligibility response has no amount")?;
    let decimals = eligibility.token_decimals.unwrap_or(18);
    info!(
        "{} can claim {} tokens",
        account,
        format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
    );

    let root = client.root().await?;
    info!("Served merkle root {} over {} leaves", root.root, root.leaves);

    let provider = ProviderBuilder::new()
        .wallet(signer.clone())
        .connect(&chain.url)
        .await
        .context("Failed to connect to rpc")?;

    let submitter = ClaimSubmitter::new(
        provider,
        config.airdrop.contract_address,
        config.airdrop.chain_id,
    )
    .with_expected_root(root.root)
    .dry_run(config.test);

    match submitter
        .submit(account, &eligibility, &WalletSigner(signer))
        .await
    {
        Ok(ClaimOutcome::Prepared(request)) => {
            info!(
                "Prepared claim for {}: v={} r={} s={} proof_len={}",
                request.account,
                request.signature.v,
                request.signature.r,
                request.signature.s,
                request.proof.len()
            );
        }
        Ok(ClaimOutcome::Confirmed(receipt)) => {
            info!(
                "Airdrop claimed in transaction {} (block {:?})",
                receipt.tx_hash, receipt.block_number
            );
        }
        Err(e) => {
            error!("Airdrop claim failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
