//! Static per-network deployment parameters.
//!
//! Development networks run against a local node with a mocked VRF
//! coordinator. Every other network must carry a coordinator address and a
//! subscription id, either in the table below or through configuration.

use crate::error::{FightersError, Result};
use ethers::types::{Address, H256};
use std::str::FromStr;

pub const DEVELOPMENT_NETWORKS: [&str; 2] = ["hardhat", "localhost"];

/// Chain whose explorer accepts source verification.
pub const VERIFICATION_CHAIN_ID: u64 = 5;

pub const GOERLI: &str = "goerli";

const DEV_CONFIRMATIONS: usize = 1;
const PUBLIC_CONFIRMATIONS: usize = 6;

struct NetworkEntry {
    name: &'static str,
    chain_id: u64,
    vrf_coordinator: Option<&'static str>,
    key_hash: &'static str,
    callback_gas_limit: u32,
}

// Goerli 150 gwei lane. Local mocks accept any key hash, so they reuse it.
const GOERLI_KEY_HASH: &str = "0x79d3d8832d904592c0bf9818b621522c988bb8b0c05cdc3b15aea1b6e8db0c15";

const NETWORKS: &[NetworkEntry] = &[
    NetworkEntry {
        name: "hardhat",
        chain_id: 31337,
        vrf_coordinator: None,
        key_hash: GOERLI_KEY_HASH,
        callback_gas_limit: 500_000,
    },
    NetworkEntry {
        name: "localhost",
        chain_id: 31337,
        vrf_coordinator: None,
        key_hash: GOERLI_KEY_HASH,
        callback_gas_limit: 500_000,
    },
    NetworkEntry {
        name: GOERLI,
        chain_id: 5,
        vrf_coordinator: Some("0x2Ca8E0C643bDe4C2E08ab1fA0da3401AdAD7734D"),
        key_hash: GOERLI_KEY_HASH,
        callback_gas_limit: 500_000,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub vrf_coordinator: Option<Address>,
    pub vrf_subscription_id: Option<u64>,
    pub key_hash: H256,
    pub callback_gas_limit: u32,
}

impl NetworkConfig {
    pub fn is_development(&self) -> bool {
        is_development(&self.name)
    }

    pub fn confirmations(&self) -> usize {
        confirmations_for(&self.name)
    }
}

pub fn is_development(network: &str) -> bool {
    DEVELOPMENT_NETWORKS.contains(&network)
}

pub fn confirmations_for(network: &str) -> usize {
    if is_development(network) {
        DEV_CONFIRMATIONS
    } else {
        PUBLIC_CONFIRMATIONS
    }
}

pub fn known_networks() -> impl Iterator<Item = &'static str> {
    NETWORKS.iter().map(|n| n.name)
}

/// Resolves `network` from the static table. `subscription_id` fills the
/// subscription of public networks, since it is an account-specific value.
pub fn lookup(network: &str, subscription_id: Option<u64>) -> Result<NetworkConfig> {
    let entry = NETWORKS
        .iter()
        .find(|n| n.name == network)
        .ok_or_else(|| {
            FightersError::ConfigError(format!(
                "Unknown network: {} (known: {})",
                network,
                known_networks().collect::<Vec<_>>().join(", ")
            ))
        })?;

    let vrf_coordinator = entry
        .vrf_coordinator
        .map(|addr| {
            Address::from_str(addr).map_err(|e| {
                FightersError::ConfigError(format!("Invalid coordinator for {}: {}", network, e))
            })
        })
        .transpose()?;

    let key_hash = H256::from_str(entry.key_hash)
        .map_err(|e| FightersError::ConfigError(format!("Invalid key hash for {}: {}", network, e)))?;

    Ok(NetworkConfig {
        name: entry.name.to_string(),
        chain_id: entry.chain_id,
        vrf_coordinator,
        vrf_subscription_id: if is_development(network) {
            None
        } else {
            subscription_id
        },
        key_hash,
        callback_gas_limit: entry.callback_gas_limit,
    })
}
