use crate::{allowlist::parse_amount, error::ValidationError};
use alloy::primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Query string of `GET /eligibility`.
#[derive(Debug, Default, Deserialize)]
pub struct EligibilityQuery {
    pub address: Option<String>,
}

/// Answer to an eligibility query.
///
/// An ineligible account serializes as `{"eligible": false}` with every other
/// field omitted.
///
/// # Example
///
/// ```json
/// {
///     "eligible": true,
///     "amount": "100000000000000000000",
///     "proof": ["0x5c1f..."],
///     "tokenDecimals": 18
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Vec<B256>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_decimals: Option<u8>,
}

impl EligibilityResult {
    pub fn not_eligible() -> Self {
        Self {
            eligible: false,
            amount: None,
            proof: None,
            token_decimals: None,
        }
    }

    pub fn eligible(amount: U256, proof: Vec<B256>, token_decimals: u8) -> Self {
        Self {
            eligible: true,
            amount: Some(amount.to_string()),
            proof: Some(proof),
            token_decimals: Some(token_decimals),
        }
    }

    /// The claim amount in base units, if the result carries one.
    pub fn amount_value(&self) -> Result<Option<U256>, ValidationError> {
        self.amount.as_deref().map(parse_amount).transpose()
    }
}

/// Body of `GET /root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub root: B256,
    pub leaves: usize,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
}
