use crate::error::ValidationError;
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The allowlist shipped with the service.
const BUNDLED_ALLOWLIST: &str = include_str!("../allowlist.json");

/// One account entitled to claim, with its amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowlistEntry {
    pub account: Address,
    pub amount: U256,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    amount: String,
    decimals: u8,
}

/// Fixed table of eligible accounts, keyed by address.
///
/// Addresses are stored as bytes, so lookups are case-insensitive with respect
/// to the hex text they were parsed from.
#[derive(Debug, Clone)]
pub struct Allowlist {
    entries: BTreeMap<Address, AllowlistEntry>,
}

/// Parses a `0x`-prefixed, 40 hex character account identifier.
///
/// Mixed, lower and upper case input all parse to the same address. No
/// checksum validation is applied.
pub fn parse_account(input: &str) -> Result<Address, ValidationError> {
    let hex_part = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or(ValidationError::InvalidAddress)?;
    if hex_part.len() != 40 {
        return Err(ValidationError::InvalidAddress);
    }
    let mut bytes = [0u8; 20];
    alloy::hex::decode_to_slice(hex_part, &mut bytes)
        .map_err(|_| ValidationError::InvalidAddress)?;
    Ok(Address::from(bytes))
}

/// Parses a base-10 amount into a `uint256`.
pub fn parse_amount(input: &str) -> Result<U256, ValidationError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount(input.to_string()));
    }
    U256::from_str_radix(input, 10).map_err(|e| ValidationError::InvalidAmount(e.to_string()))
}

impl Allowlist {
    pub fn from_entries(entries: impl IntoIterator<Item = AllowlistEntry>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if map.insert(entry.account, entry).is_some() {
                bail!("Duplicate allowlist entry for {}", entry.account);
            }
        }
        if map.is_empty() {
            bail!("Allowlist is empty");
        }
        Ok(Self { entries: map })
    }

    /// Parses the `{ "<address>": { "amount": "<decimal>", "decimals": n } }` table format.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawEntry> =
            serde_json::from_str(content).context("Failed to parse allowlist JSON")?;

        let entries = raw
            .into_iter()
            .map(|(account, entry)| {
                Ok(AllowlistEntry {
                    account: parse_account(&account)
                        .with_context(|| format!("Invalid allowlist address {account:?}"))?,
                    amount: parse_amount(&entry.amount)
                        .with_context(|| format!("Invalid allowlist amount for {account}"))?,
                    decimals: entry.decimals,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_entries(entries)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read allowlist file {path}"))?;
        Self::from_json(&content)
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_ALLOWLIST)
    }

    pub fn get(&self, account: &Address) -> Option<&AllowlistEntry> {
        self.entries.get(account)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AllowlistEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
