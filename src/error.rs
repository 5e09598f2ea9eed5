use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Input that the caller can correct and resend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid address parameter")]
    InvalidAddress,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
    #[error("signer {actual} cannot claim for account {expected}")]
    SignerMismatch { expected: Address, actual: Address },
    #[error("merkle proof does not lead to root {root}")]
    InvalidProof { root: B256 },
    #[error("EIP-712 digest {local} does not match the contract's message hash {onchain}")]
    DomainMismatch { local: B256, onchain: B256 },
}

/// Reason an on-chain claim was rejected by the contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevertReason {
    #[error("airdrop already claimed for this account")]
    AlreadyClaimed,
    #[error("merkle proof rejected by the contract")]
    InvalidProof,
    #[error("signature rejected by the contract")]
    InvalidSignature,
    #[error("{0}")]
    Other(String),
}

/// Every way a claim attempt can end short of an included transaction.
///
/// None of these are retried automatically. A retry is always a new call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("account is not eligible for the airdrop")]
    NotEligible,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("signature request was rejected: {0}")]
    UserCancelled(String),
    #[error("signer could not produce a claim signature: {0}")]
    SigningFailed(String),
    #[error("claim reverted: {0}")]
    ChainRevert(RevertReason),
    #[error("network error: {0}")]
    TransientNetwork(String),
    #[error("connected to chain {actual}, expected chain {expected}")]
    WrongChain { expected: u64, actual: u64 },
    #[error("local merkle root {local} does not match on-chain root {onchain}")]
    RootMismatch { local: B256, onchain: B256 },
}

/// Errors raised while building or reading a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a merkle tree without leaves")]
    Empty,
    #[error("leaf {0} is not in the tree")]
    LeafNotFound(B256),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_message() {
        assert_eq!(
            ValidationError::InvalidAddress.to_string(),
            "Invalid address parameter"
        );
    }

    #[test]
    fn test_revert_reason_is_surfaced_verbatim() {
        let err = ClaimError::ChainRevert(RevertReason::Other(
            "execution reverted: paused".to_string(),
        ));
        assert_eq!(err.to_string(), "claim reverted: execution reverted: paused");
    }

    #[test]
    fn test_validation_converts_into_claim_error() {
        let err: ClaimError = ValidationError::InvalidSignatureLength(64).into();
        assert_eq!(
            err,
            ClaimError::Validation(ValidationError::InvalidSignatureLength(64))
        );
    }
}
