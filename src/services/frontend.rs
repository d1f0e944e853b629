use crate::deploy::{FrontEndSink, FrontEndTarget};
use crate::error::{FightersError, Result};
use crate::models::DeployedContract;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// chain id -> contract name -> every address it was deployed at.
pub type ContractAddresses = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// The contract-address files read by the web client.
#[derive(Debug, Clone)]
pub struct FrontEndArtifacts {
    contracts_file: PathBuf,
    testing_file: PathBuf,
}

impl FrontEndArtifacts {
    pub fn new(contracts_file: impl Into<PathBuf>, testing_file: impl Into<PathBuf>) -> Self {
        Self {
            contracts_file: contracts_file.into(),
            testing_file: testing_file.into(),
        }
    }

    pub fn path(&self, target: FrontEndTarget) -> &Path {
        match target {
            FrontEndTarget::Primary => &self.contracts_file,
            FrontEndTarget::Testing => &self.testing_file,
        }
    }

    pub async fn read(&self, target: FrontEndTarget) -> Result<ContractAddresses> {
        let path = self.path(target);
        match tokio::fs::read_to_string(path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(ContractAddresses::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ContractAddresses::new()),
            Err(e) => Err(FightersError::io(path, e)),
        }
    }
}

#[async_trait]
impl FrontEndSink for FrontEndArtifacts {
    async fn publish(&self, contract: &DeployedContract, target: FrontEndTarget) -> Result<()> {
        let mut addresses = self.read(target).await?;
        let address = format!("{:?}", contract.address);

        let known = addresses
            .entry(contract.chain_id.to_string())
            .or_default()
            .entry(contract.contract.clone())
            .or_default();
        if known.iter().any(|a| a.eq_ignore_ascii_case(&address)) {
            tracing::debug!("{} already listed for {}", address, contract.contract);
            return Ok(());
        }
        known.push(address);

        let path = self.path(target);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FightersError::io(parent, e))?;
        }
        let body = serde_json::to_string_pretty(&addresses)?;
        tokio::fs::write(path, body)
            .await
            .map_err(|e| FightersError::io(path, e))?;

        tracing::info!("Front end contract addresses updated ({})", path.display());
        Ok(())
    }
}
