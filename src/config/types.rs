use std::collections::BTreeMap;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub allowance: AllowanceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Supported chains in canonical order.
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainConfig>,
}

/// SDK session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Named SDK deployment (e.g., "coral" for testnet).
    #[serde(default = "default_network")]
    pub network: String,
}

/// Allowance batch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceConfig {
    /// Multiplier from the user-entered unit to the token's base unit.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: u64,
    /// Spender address attached to every allowance request.
    #[serde(default = "default_spender")]
    pub spender: Address,
}

/// Balance display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Exponent used for assets missing from `decimals`.
    #[serde(default)]
    pub default_decimals: u8,
    /// Display exponent per asset symbol.
    #[serde(default = "default_decimals_table")]
    pub decimals: BTreeMap<String, u8>,
}

/// One entry of the chain registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Display name (e.g., "Ethereum", "Base").
    pub name: String,
    /// USDC contract on this chain. Chains without one are skipped by allowance batches.
    #[serde(default)]
    pub usdc: Option<Address>,
}

impl Config {
    /// Chain ids in canonical order.
    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains.iter().map(|c| c.chain_id).collect()
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Display name for a chain, `Chain <id>` when unknown.
    pub fn chain_name(&self, chain_id: u64) -> String {
        self.chain(chain_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Chain {}", chain_id))
    }
}

fn default_network() -> String {
    "coral".to_string()
}

fn default_scale_factor() -> u64 {
    1000
}

fn default_spender() -> Address {
    address!("0x0000000000000000000000000000000000000001")
}

fn default_decimals_table() -> BTreeMap<String, u8> {
    BTreeMap::from([
        ("ETH".to_string(), 18),
        ("USDC".to_string(), 6),
        ("USDT".to_string(), 6),
    ])
}

fn chain(chain_id: u64, name: &str, usdc: Address) -> ChainConfig {
    ChainConfig {
        chain_id,
        name: name.to_string(),
        usdc: Some(usdc),
    }
}

fn default_chains() -> Vec<ChainConfig> {
    vec![
        chain(1, "Ethereum", address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")),
        chain(10, "Optimism", address!("0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85")),
        chain(42161, "Arbitrum", address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831")),
        chain(43114, "Avalanche", address!("0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E")),
        chain(137, "Polygon", address!("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359")),
        chain(534352, "Scroll", address!("0x06eFdBFf2a14a7c8E15944D1F4A48F9F95F663A4")),
        chain(59144, "Linea", address!("0x176211869cA2b568f2A7D4EE941E073a821EE1ff")),
        chain(8453, "Base", address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")),
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
        }
    }
}

impl Default for AllowanceConfig {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            spender: default_spender(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_decimals: 0,
            decimals: default_decimals_table(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            allowance: AllowanceConfig::default(),
            display: DisplayConfig::default(),
            chains: default_chains(),
        }
    }
}
