use crate::deploy::ArtifactDeployer;
use crate::error::{FightersError, Result};
use crate::models::{token_to_json, DeployRequest, DeployedContract, DeploymentRecord};
use crate::services::{ArtifactStore, DeploymentRegistry};
use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::Utc;
use ethers::{
    abi::Token,
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use std::sync::Arc;
use std::time::Duration;

/// Signing client every deployment transaction goes through.
pub type DeployClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Connects to `rpc_url` and checks the node serves `expected_chain_id`.
pub async fn connect(
    rpc_url: &str,
    private_key: &str,
    expected_chain_id: u64,
    poll_interval: Duration,
) -> anyhow::Result<Arc<DeployClient>> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .with_context(|| format!("Invalid RPC URL: {}", rpc_url))?
        .interval(poll_interval);

    let chain_id = provider
        .get_chainid()
        .await
        .context("Failed to query chain id")?
        .as_u64();
    if chain_id != expected_chain_id {
        bail!(
            "RPC endpoint serves chain {} but network expects {}",
            chain_id,
            expected_chain_id
        );
    }

    let block_number = provider.get_block_number().await?;
    tracing::info!("RPC connected to chain {}, current block: {}", chain_id, block_number);

    let wallet = private_key
        .parse::<LocalWallet>()
        .context("Invalid deployer key")?
        .with_chain_id(chain_id);
    tracing::info!("Deployer account ---> {:?}", wallet.address());

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Deploys compiled artifacts and records them in the registry.
pub struct ChainDeployer {
    client: Arc<DeployClient>,
    artifacts: ArtifactStore,
    registry: DeploymentRegistry,
    chain_id: u64,
}

impl ChainDeployer {
    pub fn new(
        client: Arc<DeployClient>,
        artifacts: ArtifactStore,
        registry: DeploymentRegistry,
        chain_id: u64,
    ) -> Self {
        Self {
            client,
            artifacts,
            registry,
            chain_id,
        }
    }

    pub fn client(&self) -> Arc<DeployClient> {
        self.client.clone()
    }

    pub fn registry(&self) -> &DeploymentRegistry {
        &self.registry
    }
}

#[async_trait]
impl ArtifactDeployer for ChainDeployer {
    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract> {
        let artifact = self.artifacts.load(&request.contract)?;
        let factory = ContractFactory::new(
            artifact.parsed_abi()?,
            artifact.parsed_bytecode()?,
            self.client.clone(),
        );

        tracing::info!(
            contract = %request.contract,
            confirmations = request.confirmations,
            "Deploying {} with {} constructor args",
            request.contract,
            request.args.len()
        );

        let (contract, receipt) = factory
            .deploy(Token::Tuple(request.args.clone()))?
            .confirmations(request.confirmations)
            .send_with_receipt()
            .await?;

        if receipt.status != Some(1.into()) {
            return Err(FightersError::CallFailed(format!(
                "deployment of {} reverted in {:?}",
                request.contract, receipt.transaction_hash
            )));
        }

        let deployed = DeployedContract {
            contract: request.contract.clone(),
            address: contract.address(),
            chain_id: self.chain_id,
            args: request.args,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()),
        };

        let record = DeploymentRecord {
            address: deployed.address,
            abi: artifact.abi.clone(),
            args: deployed.args.iter().map(token_to_json).collect(),
            transaction_hash: deployed.transaction_hash,
            block_number: deployed.block_number,
            deployed_at: Utc::now(),
        };
        self.registry.save(&deployed.contract, self.chain_id, &record)?;

        tracing::info!(
            "{} deployed at {:?} (tx: {:?})",
            deployed.contract,
            deployed.address,
            deployed.transaction_hash
        );

        Ok(deployed)
    }
}
