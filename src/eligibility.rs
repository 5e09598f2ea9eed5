pub mod models;

use crate::{
    allowlist::{Allowlist, AllowlistEntry, parse_account},
    api_error::ApiError,
    error::{MerkleError, ValidationError},
    merkle::{self, MerkleTree},
};
use alloy::primitives::{Address, B256};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use models::{EligibilityQuery, EligibilityResult};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Answers eligibility queries from an allowlist and the Merkle tree built over it.
///
/// Both are fixed at construction. Queries only read, so one instance can be
/// shared across every request handler.
#[derive(Debug, Clone)]
pub struct Eligibility {
    allowlist: Allowlist,
    tree: MerkleTree,
}

impl Eligibility {
    pub fn new(allowlist: Allowlist) -> Result<Self, MerkleError> {
        let tree = MerkleTree::new(allowlist.iter().map(Self::leaf))?;
        Ok(Self { allowlist, tree })
    }

    fn leaf(entry: &AllowlistEntry) -> B256 {
        merkle::leaf(entry.account, entry.amount)
    }

    /// Checks a hex address taken from user input.
    pub fn check(&self, address: &str) -> Result<EligibilityResult, ApiError> {
        let account = parse_account(address)?;
        self.check_account(account).map_err(|e| {
            error!("No merkle proof for allowlisted account {}: {}", account, e);
            e.into()
        })
    }

    /// Fails only if an allowlisted account has no leaf in the tree.
    pub fn check_account(&self, account: Address) -> Result<EligibilityResult, MerkleError> {
        let Some(entry) = self.allowlist.get(&account) else {
            return Ok(EligibilityResult::not_eligible());
        };

        let leaf = Self::leaf(entry);
        let proof = self
            .tree
            .proof(&leaf)
            .ok_or(MerkleError::LeafNotFound(leaf))?;
        Ok(EligibilityResult::eligible(entry.amount, proof, entry.decimals))
    }

    pub fn root(&self) -> B256 {
        self.tree.root()
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }
}

/// `GET /eligibility?address=<hex>`.
///
/// Absence from the allowlist is a normal `200` answer. A missing or malformed
/// address is a `400` with `{"error": "Invalid address parameter"}`.
pub async fn eligibility_handler(
    State(eligibility): State<Arc<Eligibility>>,
    query: Result<Query<EligibilityQuery>, QueryRejection>,
) -> Result<Json<EligibilityResult>, ApiError> {
    let address = query
        .ok()
        .and_then(|Query(query)| query.address)
        .ok_or(ValidationError::InvalidAddress)?;

    let result = eligibility.check(&address).map_err(|e| {
        warn!("Rejected eligibility query {:?}: {}", address, e);
        e
    })?;
    info!(
        "Eligibility for {}: eligible={} proof_len={}",
        address,
        result.eligible,
        result.proof.as_ref().map_or(0, Vec::len)
    );

    Ok(Json(result))
}

pub fn routes() -> Router<Arc<Eligibility>> {
    Router::new().route("/eligibility", get(eligibility_handler))
}
