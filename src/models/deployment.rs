use chrono::{DateTime, Utc};
use ethers::abi::Token;
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BFNFT_RNDM_WORDS: &str = "BFNFTRndmWords";
pub const FIGHT: &str = "Fight";
pub const VRF_COORDINATOR_MOCK: &str = "VRFCoordinatorV2Mock";

/// A contract to deploy from its compiled artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployRequest {
    pub contract: String,
    pub args: Vec<Token>,
    pub confirmations: usize,
}

impl DeployRequest {
    pub fn new(contract: &str, args: Vec<Token>, confirmations: usize) -> Self {
        Self {
            contract: contract.to_string(),
            args,
            confirmations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployedContract {
    pub contract: String,
    pub address: Address,
    pub chain_id: u64,
    pub args: Vec<Token>,
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
}

impl DeployedContract {
    /// ABI encoding of the constructor arguments, as explorers expect it.
    pub fn encoded_args(&self) -> String {
        hex::encode(ethers::abi::encode(&self.args))
    }
}

/// Entry of the deployed-contracts registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub address: Address,
    pub abi: Value,
    pub args: Vec<Value>,
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    AlreadyVerified,
}

/// JSON form of a constructor argument. Integers are decimal strings so
/// 256-bit values survive the round trip through JavaScript tooling.
pub fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(addr) => Value::String(format!("{:?}", addr)),
        Token::Uint(n) | Token::Int(n) => Value::String(n.to_string()),
        Token::Bool(b) => Value::Bool(*b),
        Token::String(s) => Value::String(s.clone()),
        Token::FixedBytes(bytes) | Token::Bytes(bytes) => {
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;

    #[test]
    fn constructor_args_render_as_registry_json() {
        let addr: Address = "0x2Ca8E0C643bDe4C2E08ab1fA0da3401AdAD7734D".parse().unwrap();
        let json: Vec<Value> = [
            Token::Address(addr),
            Token::Uint(U256::from(812u64)),
            Token::FixedBytes(vec![0xab; 2]),
        ]
        .iter()
        .map(token_to_json)
        .collect();

        assert_eq!(json[0], "0x2ca8e0c643bde4c2e08ab1fa0da3401adad7734d");
        assert_eq!(json[1], "812");
        assert_eq!(json[2], "0xabab");
    }

    #[test]
    fn encoded_args_are_bare_hex_words() {
        let deployed = DeployedContract {
            contract: FIGHT.to_string(),
            address: Address::zero(),
            chain_id: 5,
            args: vec![Token::Uint(U256::from(1u64))],
            transaction_hash: H256::zero(),
            block_number: None,
        };
        let encoded = deployed.encoded_args();
        assert_eq!(encoded.len(), 64);
        assert!(encoded.ends_with('1'));
        assert!(!encoded.starts_with("0x"));
    }
}
