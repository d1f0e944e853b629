use crate::contracts::SUBSCRIPTION_FUND_AMOUNT;
use crate::deploy::{
    ArtifactDeployer, ConsumerRegistry, CoordinatorSource, FrontEndSink, FrontEndTarget,
    SourceVerifier, SubscriptionOwner,
};
use crate::error::{FightersError, Result};
use crate::models::{DeployRequest, DeployedContract, VerificationStatus, BFNFT_RNDM_WORDS};
use crate::networks::{NetworkConfig, VERIFICATION_CHAIN_ID};
use ethers::abi::Token;
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Everything the procedure touches outside its own memory.
pub struct DeploySeams<'a> {
    pub deployer: &'a dyn ArtifactDeployer,
    pub coordinators: &'a dyn CoordinatorSource,
    /// Present only when an explorer API key is configured.
    pub verifier: Option<&'a dyn SourceVerifier>,
    pub front_end: &'a dyn FrontEndSink,
}

#[derive(Debug, Clone)]
pub struct RndmWordsDeployment {
    pub contract: DeployedContract,
    pub coordinator: Address,
    pub subscription_id: u64,
    pub verification: Option<VerificationStatus>,
}

enum Coordinator {
    Development(Arc<dyn SubscriptionOwner>),
    Public(Arc<dyn ConsumerRegistry>),
}

pub fn should_verify(has_api_key: bool, chain_id: u64) -> bool {
    has_api_key && chain_id == VERIFICATION_CHAIN_ID
}

/// `[coordinator, subscriptionId, keyHash, callbackGasLimit]`
pub fn constructor_args(
    coordinator: Address,
    subscription_id: u64,
    network: &NetworkConfig,
) -> Vec<Token> {
    vec![
        Token::Address(coordinator),
        Token::Uint(U256::from(subscription_id)),
        Token::FixedBytes(network.key_hash.as_bytes().to_vec()),
        Token::Uint(U256::from(network.callback_gas_limit)),
    ]
}

/// Deploys `BFNFTRndmWords` and wires it to a VRF subscription.
pub async fn deploy_rndm_words(
    network: &NetworkConfig,
    testing_on_local: bool,
    seams: &DeploySeams<'_>,
) -> Result<RndmWordsDeployment> {
    let span = tracing::info_span!(
        "deploy",
        run_id = %Uuid::new_v4(),
        network = %network.name,
        contract = BFNFT_RNDM_WORDS
    );
    run(network, testing_on_local, seams).instrument(span).await
}

async fn run(
    network: &NetworkConfig,
    testing_on_local: bool,
    seams: &DeploySeams<'_>,
) -> Result<RndmWordsDeployment> {
    let (coordinator, subscription_id) = if network.is_development() {
        let mock = seams.coordinators.development().await?;
        let subscription_id = mock.create_subscription().await?;
        let amount = parse_ether(SUBSCRIPTION_FUND_AMOUNT)
            .map_err(|e| FightersError::ConfigError(e.to_string()))?;
        mock.fund_subscription(subscription_id, amount).await?;
        (Coordinator::Development(mock), subscription_id)
    } else {
        let address = network.vrf_coordinator.ok_or_else(|| {
            FightersError::ConfigError(format!("No VRF coordinator configured for {}", network.name))
        })?;
        let subscription_id = network.vrf_subscription_id.ok_or_else(|| {
            FightersError::ConfigError(format!("No VRF subscription configured for {}", network.name))
        })?;
        (Coordinator::Public(seams.coordinators.public(address)?), subscription_id)
    };

    let coordinator_address = match &coordinator {
        Coordinator::Development(mock) => mock.address(),
        Coordinator::Public(client) => client.address(),
    };

    let args = constructor_args(coordinator_address, subscription_id, network);
    let request = DeployRequest::new(BFNFT_RNDM_WORDS, args, network.confirmations());
    let contract = seams.deployer.deploy(request).await?;
    tracing::info!("{} deployed at {:?}", BFNFT_RNDM_WORDS, contract.address);

    seams.front_end.publish(&contract, FrontEndTarget::Primary).await?;

    let mut verification = None;
    match &coordinator {
        Coordinator::Development(mock) => {
            mock.add_consumer(subscription_id, contract.address).await?;
            tracing::debug!("Consumer added.");
        }
        Coordinator::Public(client) => {
            client.add_consumer(subscription_id, contract.address).await?;
            tracing::info!("{} added as consumer!", BFNFT_RNDM_WORDS);

            let verify = should_verify(seams.verifier.is_some(), contract.chain_id);
            match seams.verifier {
                Some(verifier) if verify => {
                    verification = Some(verifier.verify(&contract).await?);
                    tracing::info!("Verified on Etherscan!");
                }
                _ => tracing::debug!("Skipping source verification"),
            }
        }
    }

    if testing_on_local {
        seams.front_end.publish(&contract, FrontEndTarget::Testing).await?;
    }

    Ok(RndmWordsDeployment {
        contract,
        coordinator: coordinator_address,
        subscription_id,
        verification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks;

    #[test]
    fn verification_needs_key_and_target_chain() {
        assert!(should_verify(true, VERIFICATION_CHAIN_ID));
        assert!(!should_verify(false, VERIFICATION_CHAIN_ID));
        assert!(!should_verify(true, 31337));
    }

    #[test]
    fn constructor_args_follow_contract_order() {
        let net = networks::lookup(networks::GOERLI, Some(77)).unwrap();
        let coordinator = net.vrf_coordinator.unwrap();
        let args = constructor_args(coordinator, 77, &net);

        assert_eq!(args[0], Token::Address(coordinator));
        assert_eq!(args[1], Token::Uint(U256::from(77u64)));
        assert_eq!(args[2], Token::FixedBytes(net.key_hash.as_bytes().to_vec()));
        assert_eq!(args[3], Token::Uint(U256::from(500_000u32)));
    }
}
