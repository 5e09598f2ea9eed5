//! Claim submission: EIP-712 signature, signature split, `claim` transaction.

use crate::{
    contract::{AirdropClaim, MerkleAirdrop, claim_signing_hash, domain},
    eligibility::models::EligibilityResult,
    error::{ClaimError, RevertReason, ValidationError},
    merkle,
    signature::SplitSignature,
};
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    providers::Provider,
    signers::{self, Signer},
    sol_types::{Eip712Domain, SolError},
};
use tracing::{error, info, warn};

// Number of confirmations required for a claim to be considered included
const CONFIRMATIONS: u64 = 1;

/// Something that can sign an EIP-712 `AirdropClaim` on behalf of one account.
///
/// The typed claim and its domain are handed over as-is, so wallets that only
/// sign structured data (`eth_signTypedData_v4`) can sit behind this trait.
/// Implementations report a refused request as [`ClaimError::UserCancelled`]
/// and any other failure as [`ClaimError::SigningFailed`].
pub trait ClaimSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Returns the 65-byte `r || s || v` signature over `claim` under `domain`.
    fn sign_claim(
        &self,
        claim: &AirdropClaim,
        domain: &Eip712Domain,
    ) -> impl Future<Output = Result<Bytes, ClaimError>> + Send;
}

/// Adapts any alloy [`Signer`] to [`ClaimSigner`] through `sign_typed_data`.
#[derive(Debug, Clone)]
pub struct WalletSigner<S>(pub S);

impl<S: Signer + Send + Sync> ClaimSigner for WalletSigner<S> {
    fn address(&self) -> Address {
        self.0.address()
    }

    fn sign_claim(
        &self,
        claim: &AirdropClaim,
        domain: &Eip712Domain,
    ) -> impl Future<Output = Result<Bytes, ClaimError>> + Send {
        async move {
            self.0
                .sign_typed_data(claim, domain)
                .await
                .map(|signature| Bytes::copy_from_slice(&signature.as_bytes()))
                .map_err(|e| signer_failure(&e))
        }
    }
}

/// Tells a refused signature request apart from a signer that cannot sign.
pub fn signer_failure(err: &signers::Error) -> ClaimError {
    let message = err.to_string();
    if !err.is_unsupported() {
        let lowercase = message.to_lowercase();
        if ["reject", "denied", "cancel"]
            .iter()
            .any(|word| lowercase.contains(word))
        {
            return ClaimError::UserCancelled(message);
        }
    }
    ClaimError::SigningFailed(message)
}

/// Everything the `claim` entry point needs for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub account: Address,
    pub amount: U256,
    pub proof: Vec<B256>,
    pub signature: SplitSignature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Signed and validated but not broadcast.
    Prepared(ClaimRequest),
    Confirmed(ClaimReceipt),
}

/// Extracts the amount and proof from an eligibility answer for `account`.
pub fn claim_inputs(
    account: Address,
    signer: Address,
    eligibility: &EligibilityResult,
) -> Result<(U256, Vec<B256>), ClaimError> {
    if !eligibility.eligible {
        return Err(ClaimError::NotEligible);
    }
    if signer != account {
        return Err(ValidationError::SignerMismatch {
            expected: account,
            actual: signer,
        }
        .into());
    }
    let amount = eligibility.amount_value()?.ok_or(ClaimError::NotEligible)?;
    let proof = eligibility.proof.clone().unwrap_or_default();
    Ok((amount, proof))
}

pub fn check_chain(expected: u64, actual: u64) -> Result<(), ClaimError> {
    if expected != actual {
        return Err(ClaimError::WrongChain { expected, actual });
    }
    Ok(())
}

pub fn check_root(local: B256, onchain: B256) -> Result<(), ClaimError> {
    if local != onchain {
        return Err(ClaimError::RootMismatch { local, onchain });
    }
    Ok(())
}

pub fn check_message_hash(local: B256, onchain: B256) -> Result<(), ClaimError> {
    if local != onchain {
        return Err(ValidationError::DomainMismatch { local, onchain }.into());
    }
    Ok(())
}

fn selector_hex(selector: [u8; 4]) -> String {
    format!("0x{}", alloy::hex::encode(selector))
}

/// Maps a provider or contract error message onto the claim error taxonomy.
///
/// Custom errors are recognised by selector or by name. Any other revert is
/// passed through verbatim. Everything else is treated as a network failure.
pub fn classify_failure(message: &str) -> ClaimError {
    let known = [
        (
            MerkleAirdrop::MerkleAirdrop__AlreadyClaimed::SELECTOR,
            MerkleAirdrop::MerkleAirdrop__AlreadyClaimed::SIGNATURE,
            RevertReason::AlreadyClaimed,
        ),
        (
            MerkleAirdrop::MerkleAirdrop__InvalidProof::SELECTOR,
            MerkleAirdrop::MerkleAirdrop__InvalidProof::SIGNATURE,
            RevertReason::InvalidProof,
        ),
        (
            MerkleAirdrop::MerkleAirdrop__InvalidSignature::SELECTOR,
            MerkleAirdrop::MerkleAirdrop__InvalidSignature::SIGNATURE,
            RevertReason::InvalidSignature,
        ),
    ];

    let lowercase = message.to_lowercase();
    for (selector, signature, reason) in known {
        let name = signature.trim_end_matches("()");
        if lowercase.contains(&selector_hex(selector)) || message.contains(name) {
            return ClaimError::ChainRevert(reason);
        }
    }

    if lowercase.contains("revert") {
        return ClaimError::ChainRevert(RevertReason::Other(message.to_string()));
    }
    ClaimError::TransientNetwork(message.to_string())
}

/// Submits claims to one deployed airdrop contract.
pub struct ClaimSubmitter<P> {
    airdrop: MerkleAirdrop::MerkleAirdropInstance<P>,
    chain_id: u64,
    expected_root: Option<B256>,
    dry_run: bool,
}

impl<P: Provider> ClaimSubmitter<P> {
    pub fn new(provider: P, contract_address: Address, chain_id: u64) -> Self {
        Self {
            airdrop: MerkleAirdrop::new(contract_address, provider),
            chain_id,
            expected_root: None,
            dry_run: false,
        }
    }

    /// Requires the contract's root, and the proof, to match `root` before signing.
    #[must_use]
    pub fn with_expected_root(mut self, root: B256) -> Self {
        self.expected_root = Some(root);
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn domain(&self) -> Eip712Domain {
        domain(self.chain_id, *self.airdrop.address())
    }

    /// Read-only checks against the chain, run before the user is asked to sign.
    pub async fn preflight(
        &self,
        account: Address,
        amount: U256,
        proof: &[B256],
    ) -> Result<(), ClaimError> {
        let chain_id = self
            .airdrop
            .provider()
            .get_chain_id()
            .await
            .map_err(|e| {
                error!("Failed to get chain id: {:?}", e);
                ClaimError::TransientNetwork(e.to_string())
            })?;
        check_chain(self.chain_id, chain_id)?;

        if let Some(root) = self.expected_root {
            let onchain_root = self
                .airdrop
                .getMerkleRoot()
                .call()
                .await
                .map_err(|e| classify_failure(&e.to_string()))?;
            check_root(root, onchain_root)?;

            if !merkle::verify(proof, merkle::leaf(account, amount), root) {
                return Err(ValidationError::InvalidProof { root }.into());
            }
        }

        let onchain_hash = self
            .airdrop
            .getMessageHash(account, amount)
            .call()
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;
        check_message_hash(
            claim_signing_hash(account, amount, &self.domain()),
            onchain_hash,
        )?;

        Ok(())
    }

    /// Asks `signer` for the EIP-712 claim signature and splits it.
    pub async fn sign<S: ClaimSigner>(
        &self,
        account: Address,
        amount: U256,
        proof: Vec<B256>,
        signer: &S,
    ) -> Result<ClaimRequest, ClaimError> {
        let domain = self.domain();
        info!(
            "Requesting claim signature for {} over {}",
            account,
            claim_signing_hash(account, amount, &domain)
        );

        let raw = signer
            .sign_claim(&AirdropClaim { account, amount }, &domain)
            .await
            .map_err(|e| {
                warn!("Signature request for {} failed: {}", account, e);
                e
            })?;
        let signature = SplitSignature::from_bytes(&raw)?;

        Ok(ClaimRequest {
            account,
            amount,
            proof,
            signature,
        })
    }

    /// Sends a signed claim and waits for it to be included.
    pub async fn send(&self, request: &ClaimRequest) -> Result<ClaimReceipt, ClaimError> {
        let SplitSignature { r, s, v } = request.signature;
        let pending_tx = self
            .airdrop
            .claim(request.account, request.amount, request.proof.clone(), v, r, s)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to submit the claim: {:?}", e);
                classify_failure(&e.to_string())
            })?;
        let tx_hash = *pending_tx.tx_hash();
        info!("Claim submitted with hash {}", tx_hash);

        let receipt = pending_tx
            .with_required_confirmations(CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| {
                error!("Failed to get receipt for {}: {:?}", tx_hash, e);
                ClaimError::TransientNetwork(e.to_string())
            })?;

        if !receipt.status() {
            return Err(ClaimError::ChainRevert(RevertReason::Other(format!(
                "transaction {tx_hash} reverted"
            ))));
        }

        info!("Claim included {:?}", receipt.transaction_hash);
        Ok(ClaimReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }

    /// Runs a full claim attempt for `account` using `signer`.
    pub async fn submit<S: ClaimSigner>(
        &self,
        account: Address,
        eligibility: &EligibilityResult,
        signer: &S,
    ) -> Result<ClaimOutcome, ClaimError> {
        let (amount, proof) = claim_inputs(account, signer.address(), eligibility)?;
        self.preflight(account, amount, &proof).await?;

        let request = self.sign(account, amount, proof, signer).await?;
        if self.dry_run {
            info!("Dry run, not broadcasting claim for {}", account);
            return Ok(ClaimOutcome::Prepared(request));
        }

        self.send(&request).await.map(ClaimOutcome::Confirmed)
    }
}
