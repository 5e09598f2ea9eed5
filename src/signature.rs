use crate::error::ValidationError;
use alloy::primitives::B256;

/// Length of an `r || s || v` encoded ECDSA signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// A signature broken into the three arguments the claim entry point takes.
///
/// `v` is passed through as-is, so it keeps whichever convention (`27/28` or
/// `0/1`) the signer produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl SplitSignature {
    /// Splits by fixed offsets: `r` is bytes 0..32, `s` is 32..64, `v` is byte 64.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(ValidationError::InvalidSignatureLength(bytes.len()));
        }
        Ok(Self {
            r: B256::from_slice(&bytes[0..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    pub fn from_hex(signature: &str) -> Result<Self, ValidationError> {
        let bytes = alloy::hex::decode(signature)
            .map_err(|e| ValidationError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
