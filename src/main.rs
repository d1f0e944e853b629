use anyhow::{Context, Result};
use nft_fighters::{
    config::Config,
    deploy::{deploy_rndm_words, DeploySeams, SourceVerifier},
    services::{
        connect, ArtifactStore, ChainCoordinators, ChainDeployer, DeploymentRegistry,
        EtherscanVerifier, FrontEndArtifacts,
    },
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let network = &config.network;

    tracing::info!("Deploying BFNFTRndmWords v{}", env!("CARGO_PKG_VERSION"));

    let poll_interval = if network.is_development() {
        Duration::from_millis(200)
    } else {
        Duration::from_secs(4)
    };
    let client = connect(&config.rpc_url, &config.deployer_key, network.chain_id, poll_interval).await?;

    let artifacts = ArtifactStore::new(&config.artifacts_dir);
    let deployer = Arc::new(ChainDeployer::new(
        client,
        artifacts.clone(),
        DeploymentRegistry::new(&config.deployments_dir, &network.name),
        network.chain_id,
    ));
    let coordinators = ChainCoordinators::new(deployer.clone());
    let front_end = FrontEndArtifacts::new(
        &config.front_end_contracts_file,
        &config.front_end_testing_file,
    );
    let verifier = config.etherscan_api_key.clone().map(|key| {
        EtherscanVerifier::new(config.etherscan_api_url.clone(), key, artifacts.clone())
    });

    let seams = DeploySeams {
        deployer: deployer.as_ref(),
        coordinators: &coordinators,
        verifier: verifier.as_ref().map(|v| v as &dyn SourceVerifier),
        front_end: &front_end,
    };

    let deployment = deploy_rndm_words(network, config.testing_on_local, &seams)
        .await
        .context("BFNFTRndmWords deployment failed")?;

    tracing::info!(
        "BFNFTRndmWords deployed at {:?} (coordinator {:?}, subscription {})",
        deployment.contract.address,
        deployment.coordinator,
        deployment.subscription_id
    );
    tracing::info!("-----------------------------------");

    Ok(())
}
