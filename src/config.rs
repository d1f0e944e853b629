use crate::networks::{self, NetworkConfig};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// First account of a local Hardhat/Anvil node. Never valid on public chains.
pub const LOCAL_DEPLOYER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub rpc_url: String,
    pub deployer_key: String,

    // Block explorer
    pub etherscan_api_key: Option<String>,
    pub etherscan_api_url: String,

    // Output locations
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,
    pub front_end_contracts_file: PathBuf,
    pub front_end_testing_file: PathBuf,
    pub testing_on_local: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network_name = var("NETWORK").unwrap_or_else(|| "hardhat".to_string());
        let development = networks::is_development(&network_name);

        let subscription_id = var("GOERLI_CHAINLINK_SUBS_ID")
            .map(|id| id.trim().parse::<u64>())
            .transpose()
            .context("Invalid GOERLI_CHAINLINK_SUBS_ID")?;
        let network = networks::lookup(&network_name, subscription_id)?;

        let rpc_url = if development {
            var("LOCAL_RPC_URL").unwrap_or_else(|| "http://127.0.0.1:8545".to_string())
        } else {
            var("GOERLI_RPC_URL").context("GOERLI_RPC_URL required")?
        };

        let deployer_key = match var("DEPLOYER_SK") {
            Some(key) => key,
            None if development => LOCAL_DEPLOYER_KEY.to_string(),
            None => bail!("DEPLOYER_SK required on {}", network_name),
        };

        let config = Self {
            network,
            rpc_url,
            deployer_key,

            etherscan_api_key: var("ETHERSCAN_API_KEY").filter(|k| !k.is_empty()),
            etherscan_api_url: var("ETHERSCAN_API_URL")
                .unwrap_or_else(|| "https://api-goerli.etherscan.io/api".to_string()),

            artifacts_dir: var("ARTIFACTS_DIR")
                .unwrap_or_else(|| "artifacts".to_string())
                .into(),
            deployments_dir: var("DEPLOYMENTS_DIR")
                .unwrap_or_else(|| "deployments".to_string())
                .into(),
            front_end_contracts_file: var("FRONT_END_CONTRACTS_FILE")
                .unwrap_or_else(|| "frontend/constants/contractAddresses.json".to_string())
                .into(),
            front_end_testing_file: var("FRONT_END_CONTRACTS_TESTING_FILE")
                .unwrap_or_else(|| "frontend/constants/contractAddressesTesting.json".to_string())
                .into(),
            testing_on_local: var("TESTING_ON_LOCAL").as_deref() == Some("true"),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.rpc_url.starts_with("http") {
            bail!("RPC URL for {} must be HTTP(S) URL", self.network.name);
        }
        if !self.deployer_key.starts_with("0x") {
            bail!("DEPLOYER_SK must start with 0x");
        }
        if !self.network.is_development() && self.deployer_key == LOCAL_DEPLOYER_KEY {
            bail!("Refusing to deploy to {} with the local development key", self.network.name);
        }
        if self.front_end_contracts_file == self.front_end_testing_file {
            bail!("Front-end contracts file and testing file must differ");
        }

        tracing::info!(
            network = %self.network.name,
            chain_id = self.network.chain_id,
            verification = self.etherscan_api_key.is_some(),
            "Configuration validated"
        );

        Ok(())
    }
}
