//! Deployment procedures and the seams they run against.
//!
//! Procedures only sequence calls; every side effect (chain, explorer,
//! files) goes through one of the traits below so a run can be replayed
//! against recording fakes.

pub mod fight;
pub mod rndm_words;

pub use fight::{deploy_fight, run_fight, FightParams, EXIT_FAILURE, EXIT_SUCCESS};
pub use rndm_words::{deploy_rndm_words, should_verify, DeploySeams, RndmWordsDeployment};

use crate::error::Result;
use crate::models::{DeployRequest, DeployedContract, VerificationStatus};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::sync::Arc;

#[async_trait]
pub trait ArtifactDeployer: Send + Sync {
    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract>;
}

/// A VRF coordinator that can authorize consumers of a subscription.
#[async_trait]
pub trait ConsumerRegistry: Send + Sync {
    fn address(&self) -> Address;

    async fn add_consumer(&self, subscription_id: u64, consumer: Address) -> Result<()>;
}

/// A coordinator the deployer controls, able to open and fund subscriptions.
#[async_trait]
pub trait SubscriptionOwner: ConsumerRegistry {
    async fn create_subscription(&self) -> Result<u64>;

    async fn fund_subscription(&self, subscription_id: u64, amount: U256) -> Result<()>;
}

#[async_trait]
pub trait CoordinatorSource: Send + Sync {
    /// Mock coordinator of a development network.
    async fn development(&self) -> Result<Arc<dyn SubscriptionOwner>>;

    /// Client for the coordinator deployed at `address`.
    fn public(&self, address: Address) -> Result<Arc<dyn ConsumerRegistry>>;
}

#[async_trait]
pub trait SourceVerifier: Send + Sync {
    async fn verify(&self, contract: &DeployedContract) -> Result<VerificationStatus>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEndTarget {
    Primary,
    Testing,
}

#[async_trait]
pub trait FrontEndSink: Send + Sync {
    async fn publish(&self, contract: &DeployedContract, target: FrontEndTarget) -> Result<()>;
}
