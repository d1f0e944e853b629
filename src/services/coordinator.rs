use crate::contracts::{
    SubscriptionCreatedFilter, VRFCoordinatorV2, VRFCoordinatorV2Mock, MOCK_BASE_FEE_WEI,
    MOCK_GAS_PRICE_LINK,
};
use crate::deploy::{ArtifactDeployer, ConsumerRegistry, CoordinatorSource, SubscriptionOwner};
use crate::error::{FightersError, Result};
use crate::models::{DeployRequest, VRF_COORDINATOR_MOCK};
use crate::services::{ChainDeployer, DeployClient, DeploymentRegistry};
use async_trait::async_trait;
use ethers::{
    abi::{RawLog, Token},
    contract::EthLogDecode,
    providers::{Http, Middleware, Provider},
    types::{Address, TransactionReceipt, U256},
};
use std::sync::Arc;

const MOCK_CONFIRMATIONS: usize = 1;

fn ensure_success(receipt: Option<TransactionReceipt>, action: &str) -> Result<TransactionReceipt> {
    let receipt = receipt.ok_or_else(|| FightersError::TransactionDropped(action.to_string()))?;
    if receipt.status != Some(1.into()) {
        return Err(FightersError::CallFailed(format!(
            "{} reverted in {:?}",
            action, receipt.transaction_hash
        )));
    }
    Ok(receipt)
}

/// Reads the id of a new subscription from its creation receipt.
pub fn subscription_id_from_receipt(receipt: &TransactionReceipt) -> Result<u64> {
    receipt
        .logs
        .iter()
        .find_map(|log| {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            SubscriptionCreatedFilter::decode_log(&raw).ok()
        })
        .map(|event| event.sub_id)
        .ok_or_else(|| FightersError::MissingEvent {
            event: "SubscriptionCreated",
            tx: format!("{:?}", receipt.transaction_hash),
        })
}

pub struct MockCoordinator {
    contract: VRFCoordinatorV2Mock<DeployClient>,
}

impl MockCoordinator {
    pub fn new(address: Address, client: Arc<DeployClient>) -> Self {
        Self {
            contract: VRFCoordinatorV2Mock::new(address, client),
        }
    }
}

#[async_trait]
impl ConsumerRegistry for MockCoordinator {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn add_consumer(&self, subscription_id: u64, consumer: Address) -> Result<()> {
        let call = self.contract.add_consumer(subscription_id, consumer);
        let receipt = call.send().await?.confirmations(MOCK_CONFIRMATIONS).await?;
        ensure_success(receipt, "addConsumer")?;

        tracing::debug!("Consumer {:?} added to subscription {}", consumer, subscription_id);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionOwner for MockCoordinator {
    async fn create_subscription(&self) -> Result<u64> {
        let call = self.contract.create_subscription();
        let receipt = call.send().await?.confirmations(MOCK_CONFIRMATIONS).await?;
        let receipt = ensure_success(receipt, "createSubscription")?;

        let subscription_id = subscription_id_from_receipt(&receipt)?;
        tracing::info!("Created VRF subscription {}", subscription_id);
        Ok(subscription_id)
    }

    async fn fund_subscription(&self, subscription_id: u64, amount: U256) -> Result<()> {
        let amount = u128::try_from(amount)
            .map_err(|_| FightersError::CallFailed(format!("funding amount {} overflows uint96", amount)))?;

        let call = self.contract.fund_subscription(subscription_id, amount);
        let receipt = call.send().await?.confirmations(MOCK_CONFIRMATIONS).await?;
        ensure_success(receipt, "fundSubscription")?;

        tracing::info!("Funded VRF subscription {} with {} juels", subscription_id, amount);
        Ok(())
    }
}

/// Coordinator on a public network, seen through its `addConsumer` only.
pub struct LiveCoordinator {
    contract: VRFCoordinatorV2<DeployClient>,
}

impl LiveCoordinator {
    pub fn new(address: Address, client: Arc<DeployClient>) -> Self {
        Self {
            contract: VRFCoordinatorV2::new(address, client),
        }
    }
}

#[async_trait]
impl ConsumerRegistry for LiveCoordinator {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn add_consumer(&self, subscription_id: u64, consumer: Address) -> Result<()> {
        let call = self.contract.add_consumer(subscription_id, consumer);
        let receipt = call.send().await?.await?;
        ensure_success(receipt, "addConsumer")?;
        Ok(())
    }
}

/// Address of the registered mock, if the node still has its code.
/// Local nodes lose their state on restart while the registry survives.
pub async fn live_mock_address(
    registry: &DeploymentRegistry,
    provider: &Provider<Http>,
) -> Result<Option<Address>> {
    let Some(record) = registry.get(VRF_COORDINATOR_MOCK)? else {
        return Ok(None);
    };

    let code = provider.get_code(record.address, None).await?;
    if code.is_empty() {
        tracing::warn!(
            "Registered {} at {:?} has no code, node was probably restarted",
            VRF_COORDINATOR_MOCK,
            record.address
        );
        return Ok(None);
    }

    tracing::debug!("Using registered {} at {:?}", VRF_COORDINATOR_MOCK, record.address);
    Ok(Some(record.address))
}

/// Resolves coordinators against a live node.
pub struct ChainCoordinators {
    deployer: Arc<ChainDeployer>,
}

impl ChainCoordinators {
    pub fn new(deployer: Arc<ChainDeployer>) -> Self {
        Self { deployer }
    }
}

#[async_trait]
impl CoordinatorSource for ChainCoordinators {
    async fn development(&self) -> Result<Arc<dyn SubscriptionOwner>> {
        let client = self.deployer.client();
        let address = match live_mock_address(self.deployer.registry(), client.inner()).await? {
            Some(address) => address,
            None => {
                tracing::info!("No live {} registered, deploying mocks...", VRF_COORDINATOR_MOCK);
                let request = DeployRequest::new(
                    VRF_COORDINATOR_MOCK,
                    vec![
                        Token::Uint(U256::from(MOCK_BASE_FEE_WEI)),
                        Token::Uint(U256::from(MOCK_GAS_PRICE_LINK)),
                    ],
                    MOCK_CONFIRMATIONS,
                );
                self.deployer.deploy(request).await?.address
            }
        };

        Ok(Arc::new(MockCoordinator::new(address, client)))
    }

    fn public(&self, address: Address) -> Result<Arc<dyn ConsumerRegistry>> {
        Ok(Arc::new(LiveCoordinator::new(address, self.deployer.client())))
    }
}
