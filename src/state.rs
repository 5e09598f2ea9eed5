use crate::allowlist::Allowlist;
use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_listen_addr() -> String {
    String::from("0.0.0.0:3000")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StateConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Allowlist table to load instead of the bundled one.
    #[serde(default)]
    pub allowlist_path: Option<String>,
    /// Base URL of the eligibility service, used by the claim CLI.
    pub eligibility_url: String,
    pub airdrop: AirdropConfig,
    pub rpc: Vec<ChainConfig>,
    /// Sign and validate claims without broadcasting them.
    #[serde(default)]
    pub test: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AirdropConfig {
    pub contract_address: Address,
    pub chain_id: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub url: String,
    pub private_key: String,
}

impl StateConfig {
    /// Path of the JSON config file, from `CONFIG_PATH` or `config.json`.
    pub fn path() -> String {
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| String::from("config.json"))
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: StateConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// The first RPC endpoint serving the airdrop's chain.
    pub fn chain(&self) -> Result<&ChainConfig> {
        self.rpc
            .iter()
            .find(|chain| chain.chain_id == self.airdrop.chain_id)
            .with_context(|| format!("No rpc found for chain {}", self.airdrop.chain_id))
    }

    pub fn load_allowlist(&self) -> Result<Allowlist> {
        match &self.allowlist_path {
            Some(path) => Allowlist::from_file(path),
            None => Allowlist::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_state_config_from_file() {
        let config = StateConfig::from_file("config.sample.json");
        assert!(config.is_ok());

        let config = config.unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.eligibility_url, "http://localhost:3000");
        assert_eq!(config.allowlist_path, None);
        assert!(!config.test);
        assert_eq!(
            config.airdrop.contract_address,
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
        assert_eq!(config.airdrop.chain_id, 1);
        assert_eq!(config.rpc.len(), 1);

        let chain = config.chain().unwrap();
        assert_eq!(chain.name, "default");
        assert_eq!(chain.chain_id, 1);
        assert_eq!(
            chain.url,
            "https://eth-mainnet.g.alchemy.com/v2/your-alchemy-key-here"
        );
        assert_eq!(chain.private_key, "your-private-key-here");

        assert_eq!(config.load_allowlist().unwrap().len(), 2);
    }

    #[test]
    fn test_state_config_deserialization() {
        let json = r#"{
            "allowlistPath": "allowlist.json",
            "eligibilityUrl": "http://localhost:4000",
            "airdrop": {
                "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "chainId": 31337
            },
            "rpc": [
                {
                    "name": "mainnet",
                    "chainId": 1,
                    "url": "https://mainnet.example.com",
                    "privateKey": "0xabc"
                },
                {
                    "name": "anvil",
                    "chainId": 31337,
                    "url": "http://127.0.0.1:8545",
                    "privateKey": "0x1234567890abcdef"
                }
            ],
            "test": true
        }"#;

        let config: StateConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.allowlist_path.as_deref(), Some("allowlist.json"));
        assert_eq!(config.airdrop.chain_id, 31337);
        assert!(config.test);
        assert_eq!(config.chain().unwrap().name, "anvil");
        assert_eq!(config.load_allowlist().unwrap().len(), 2);
    }

    #[test]
    fn test_default_path() {
        if std::env::var("CONFIG_PATH").is_err() {
            assert_eq!(StateConfig::path(), "config.json");
        }
    }

    #[test]
    fn test_missing_chain() {
        let json = r#"{
            "eligibilityUrl": "http://localhost:3000",
            "airdrop": {
                "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "chainId": 10
            },
            "rpc": []
        }"#;
        let config: StateConfig = serde_json::from_str(json).unwrap();
        assert!(config.chain().is_err());
    }

    #[test]
    fn test_invalid_json_handling() {
        let invalid_json = "{ invalid json }";
        let result: Result<StateConfig, _> = serde_json::from_str(invalid_json);
        assert!(result.is_err());
    }
}
