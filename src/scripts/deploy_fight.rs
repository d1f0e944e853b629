use anyhow::Result;
use nft_fighters::{
    config::Config,
    deploy::{run_fight, FightParams, EXIT_FAILURE},
    services::{connect, ArtifactStore, ChainDeployer, DeploymentRegistry},
};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let status = match setup().await {
        Ok((deployer, params, confirmations)) => run_fight(&deployer, &params, confirmations).await,
        Err(e) => {
            tracing::error!("{:#}", e);
            EXIT_FAILURE
        }
    };

    ExitCode::from(status)
}

async fn setup() -> Result<(ChainDeployer, FightParams, usize)> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let params = FightParams::parse(&args)?;

    let config = Config::from_env()?;
    let network = &config.network;

    let client = connect(
        &config.rpc_url,
        &config.deployer_key,
        network.chain_id,
        Duration::from_millis(500),
    )
    .await?;
    let deployer = ChainDeployer::new(
        client,
        ArtifactStore::new(&config.artifacts_dir),
        DeploymentRegistry::new(&config.deployments_dir, &network.name),
        network.chain_id,
    );

    Ok((deployer, params, network.confirmations()))
}
