use crate::error::{FightersError, Result};
use crate::models::DeploymentRecord;
use std::fs;
use std::path::PathBuf;

/// On-disk record of what has been deployed, one directory per network.
#[derive(Debug, Clone)]
pub struct DeploymentRegistry {
    dir: PathBuf,
}

impl DeploymentRegistry {
    pub fn new(root: impl Into<PathBuf>, network: &str) -> Self {
        Self {
            dir: root.into().join(network),
        }
    }

    fn record_path(&self, contract: &str) -> PathBuf {
        self.dir.join(format!("{}.json", contract))
    }

    pub fn get(&self, contract: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FightersError::io(path, e)),
        }
    }

    pub fn save(&self, contract: &str, chain_id: u64, record: &DeploymentRecord) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| FightersError::io(&self.dir, e))?;

        let chain_file = self.dir.join(".chainId");
        fs::write(&chain_file, chain_id.to_string()).map_err(|e| FightersError::io(&chain_file, e))?;

        let path = self.record_path(contract);
        let body = serde_json::to_string_pretty(record)?;
        fs::write(&path, body).map_err(|e| FightersError::io(&path, e))?;

        tracing::debug!("Saved deployment of {} to {}", contract, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ethers::types::{Address, H256};
    use serde_json::json;

    #[test]
    fn saved_record_can_be_read_back() {
        let root = std::env::temp_dir().join(format!("nft-fighters-registry-{}", uuid::Uuid::new_v4()));
        let registry = DeploymentRegistry::new(&root, "localhost");
        assert!(registry.get("Fight").unwrap().is_none());

        let record = DeploymentRecord {
            address: Address::repeat_byte(0x11),
            abi: json!([]),
            args: vec![json!("1")],
            transaction_hash: H256::repeat_byte(0x22),
            block_number: Some(7),
            deployed_at: Utc::now(),
        };
        registry.save("Fight", 31337, &record).unwrap();

        let loaded = registry.get("Fight").unwrap().unwrap();
        assert_eq!(loaded.address, record.address);
        assert_eq!(loaded.block_number, Some(7));
        assert_eq!(
            fs::read_to_string(root.join("localhost/.chainId")).unwrap(),
            "31337"
        );

        fs::remove_dir_all(root).ok();
    }
}
