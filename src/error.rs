use crate::services::chain::DeployClient;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FightersError {
    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("Contract error: {0}")]
    ContractError(#[from] ethers::contract::ContractError<DeployClient>),

    #[error("Contract call failed: {0}")]
    CallFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Artifact not found for contract {0}")]
    ArtifactNotFound(String),

    #[error("Invalid artifact {path}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("Transaction {0} was dropped before confirmation")]
    TransactionDropped(String),

    #[error("Event {event} missing from receipt of {tx}")]
    MissingEvent { event: &'static str, tx: String },

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Explorer request failed: {0}")]
    ExplorerError(#[from] reqwest::Error),

    #[error("Duplicate ClientPayment {field}: {value}")]
    DuplicatePayment { field: &'static str, value: String },

    #[error("Payment store error: {0}")]
    StoreError(String),

    #[error("Invalid bid: {0}")]
    InvalidBid(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FightersError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<redis::RedisError> for FightersError {
    fn from(e: redis::RedisError) -> Self {
        Self::StoreError(e.to_string())
    }
}

pub type Result<T, E = FightersError> = std::result::Result<T, E>;
