use crate::deploy::ArtifactDeployer;
use crate::error::{FightersError, Result};
use crate::models::{DeployRequest, DeployedContract, FIGHT};
use ethers::abi::Token;
use ethers::types::{Address, U256};
use std::str::FromStr;

/// Process exit status of a fight deployment.
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// The two fighters of a match and the NFTs they bring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightParams {
    pub address1: Address,
    pub address2: Address,
    pub nft_id1: U256,
    pub nft_id2: U256,
}

impl FightParams {
    /// Parses `[address1, address2, nftID1, nftID2]`; ids are decimal.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let [address1, address2, nft_id1, nft_id2] = values else {
            return Err(FightersError::ConfigError(format!(
                "expected 4 arguments (address1 address2 nftID1 nftID2), got {}",
                values.len()
            )));
        };

        Ok(Self {
            address1: parse_address(address1.as_ref())?,
            address2: parse_address(address2.as_ref())?,
            nft_id1: parse_id(nft_id1.as_ref())?,
            nft_id2: parse_id(nft_id2.as_ref())?,
        })
    }

    pub fn constructor_args(&self) -> Vec<Token> {
        vec![
            Token::Address(self.address1),
            Token::Address(self.address2),
            Token::Uint(self.nft_id1),
            Token::Uint(self.nft_id2),
        ]
    }
}

fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value)
        .map_err(|e| FightersError::ConfigError(format!("Invalid address {}: {}", value, e)))
}

fn parse_id(value: &str) -> Result<U256> {
    U256::from_dec_str(value)
        .map_err(|e| FightersError::ConfigError(format!("Invalid NFT id {}: {}", value, e)))
}

/// Deploys a `Fight` between the two fighters. Neither the pairing nor the
/// NFTs are checked against existing fights.
pub async fn deploy_fight(
    deployer: &dyn ArtifactDeployer,
    params: &FightParams,
    confirmations: usize,
) -> Result<DeployedContract> {
    tracing::info!("{:?}", params.address1);
    tracing::info!("{:?}", params.address2);

    let request = DeployRequest::new(FIGHT, params.constructor_args(), confirmations);
    let contract = deployer.deploy(request).await?;

    tracing::info!("{} deployed at {:?}", FIGHT, contract.address);
    Ok(contract)
}

/// Runs [`deploy_fight`] and reduces the outcome to an exit status,
/// logging the error on failure.
pub async fn run_fight(
    deployer: &dyn ArtifactDeployer,
    params: &FightParams,
    confirmations: usize,
) -> u8 {
    match deploy_fight(deployer, params, confirmations).await {
        Ok(fight) => {
            tracing::info!("Fight ready at {:?}", fight.address);
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            EXIT_FAILURE
        }
    }
}
