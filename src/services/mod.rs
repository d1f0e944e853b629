pub mod artifacts;
pub mod chain;
pub mod coordinator;
pub mod etherscan;
pub mod frontend;
pub mod payments;
pub mod registry;

pub use artifacts::{ArtifactStore, BuildInfo, ContractArtifact};
pub use chain::{connect, ChainDeployer, DeployClient};
pub use coordinator::{ChainCoordinators, LiveCoordinator, MockCoordinator};
pub use etherscan::EtherscanVerifier;
pub use frontend::{ContractAddresses, FrontEndArtifacts};
pub use payments::{MemoryPaymentStore, PaymentStore, RedisPaymentStore};
pub use registry::DeploymentRegistry;
