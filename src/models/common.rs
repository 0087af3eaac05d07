use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::errors::ConfigError;
use crate::utils::retry::RetryConfig;

pub const HARDHAT_CHAIN_ID: u64 = 31337;

// Key aliases accepted in a deployments file, in lookup order
const TOKEN_ADDRESS_KEYS: [&str; 8] = [
    "MuraroToken",
    "muraroToken",
    "token",
    "erc20",
    "tokenAddress",
    "token_address",
    "paymentToken",
    "paymentTokenAddress",
];
const NFT_ADDRESS_KEYS: [&str; 6] = [
    "MuraroNFT",
    "muraroNFT",
    "nft",
    "erc721",
    "nftAddress",
    "nft_address",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0".to_string(),
            port: 9100,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub chain_name: String,
    pub rpc_url: String,
    pub account: Address,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub networks: Networks,
    pub deployments_file: Option<String>,
    #[serde(default)]
    pub mint_receipts: Vec<B256>,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// Token and NFT contract addresses deployed on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub chain_id: u64,
    pub token_address: Address,
    pub nft_address: Address,
}

impl ContractAddresses {
    /// Reads the addresses out of a deployment JSON document.
    ///
    /// Deploy scripts name the keys inconsistently, so every known alias is tried in
    /// order and the first one present wins. A missing `chainId` means a local Hardhat node.
    pub fn from_deployment_json(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let json: Value =
            serde_json::from_str(contents).map_err(|source| ConfigError::DeploymentsInvalid {
                path: path.to_string(),
                source,
            })?;

        let token_address = lookup_address(&json, &TOKEN_ADDRESS_KEYS, "token", path)?;
        let nft_address = lookup_address(&json, &NFT_ADDRESS_KEYS, "nft", path)?;
        let chain_id = json
            .get("chainId")
            .and_then(Value::as_u64)
            .unwrap_or(HARDHAT_CHAIN_ID);

        Ok(Self {
            chain_id,
            token_address,
            nft_address,
        })
    }
}

fn lookup_address(
    json: &Value,
    keys: &[&str],
    field: &'static str,
    path: &str,
) -> Result<Address, ConfigError> {
    let raw = keys
        .iter()
        .filter_map(|key| json.get(*key))
        .find(|value| !value.is_null())
        .ok_or_else(|| ConfigError::MissingDeploymentAddress {
            field,
            path: path.to_string(),
        })?;

    raw.as_str()
        .and_then(|s| s.trim().parse::<Address>().ok())
        .ok_or_else(|| ConfigError::InvalidDeploymentAddress {
            field,
            path: path.to_string(),
            value: raw.to_string(),
        })
}

/// Per-chain contract address table, injected wherever addresses are needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Networks(Vec<ContractAddresses>);

impl Networks {
    pub fn new(entries: Vec<ContractAddresses>) -> Self {
        let mut networks = Self::default();
        for entry in entries {
            networks.upsert(entry);
        }
        networks
    }

    pub fn contracts_for(&self, chain_id: u64) -> Option<&ContractAddresses> {
        self.0.iter().find(|entry| entry.chain_id == chain_id)
    }

    // Replaces any existing entry for the same chain
    pub fn upsert(&mut self, entry: ContractAddresses) {
        match self.0.iter_mut().find(|e| e.chain_id == entry.chain_id) {
            Some(existing) => *existing = entry,
            None => self.0.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
