use crate::error::{FightersError, Result};
use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled contract as emitted by `hardhat compile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Value,
    pub bytecode: String,
    #[serde(skip)]
    pub path: PathBuf,
}

impl ContractArtifact {
    pub fn parsed_abi(&self) -> Result<Abi> {
        serde_json::from_value(self.abi.clone()).map_err(|e| FightersError::InvalidArtifact {
            path: self.path.clone(),
            reason: format!("bad abi: {}", e),
        })
    }

    pub fn parsed_bytecode(&self) -> Result<Bytes> {
        let bytecode: Bytes = self.bytecode.parse().map_err(|e| FightersError::InvalidArtifact {
            path: self.path.clone(),
            reason: format!("bad bytecode: {}", e),
        })?;
        if bytecode.is_empty() {
            return Err(FightersError::InvalidArtifact {
                path: self.path.clone(),
                reason: "empty bytecode (abstract contract or interface?)".to_string(),
            });
        }
        Ok(bytecode)
    }

    /// `contracts/X.sol:X`, the name explorers verify against.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

/// Compiler input and version recorded for a compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    pub input: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, contract: &str) -> Result<ContractArtifact> {
        let path = self
            .find(&self.root, &format!("{}.json", contract))?
            .ok_or_else(|| FightersError::ArtifactNotFound(contract.to_string()))?;

        let raw = fs::read_to_string(&path).map_err(|e| FightersError::io(&path, e))?;
        let mut artifact: ContractArtifact =
            serde_json::from_str(&raw).map_err(|e| FightersError::InvalidArtifact {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        artifact.path = path;

        tracing::debug!("Loaded artifact {} from {}", contract, artifact.path.display());
        Ok(artifact)
    }

    /// Follows the `.dbg.json` next to an artifact to its build info.
    pub fn build_info(&self, artifact: &ContractArtifact) -> Result<BuildInfo> {
        let dbg_path = artifact
            .path
            .with_file_name(format!("{}.dbg.json", artifact.contract_name));
        let raw = fs::read_to_string(&dbg_path).map_err(|e| FightersError::io(&dbg_path, e))?;
        let dbg: DebugFile = serde_json::from_str(&raw)?;

        let parent = dbg_path.parent().unwrap_or_else(|| Path::new("."));
        let info_path = parent.join(dbg.build_info);
        let raw = fs::read_to_string(&info_path).map_err(|e| FightersError::io(&info_path, e))?;
        serde_json::from_str(&raw).map_err(|e| FightersError::InvalidArtifact {
            path: info_path,
            reason: e.to_string(),
        })
    }

    fn find(&self, dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FightersError::io(dir, e)),
        };

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FightersError::io(dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                if path.file_name().is_some_and(|n| n == "build-info") {
                    continue;
                }
                subdirs.push(path);
            } else if path.file_name().is_some_and(|n| n == file_name) {
                return Ok(Some(path));
            }
        }

        // Sorted so duplicate names resolve the same way on every run
        subdirs.sort();
        for sub in subdirs {
            if let Some(found) = self.find(&sub, file_name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("nft-fighters-artifacts-{}", uuid::Uuid::new_v4()))
    }

    fn write_json(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    #[test]
    fn loads_artifact_and_build_info() {
        let root = scratch_dir();
        let dir = root.join("contracts/Fight.sol");
        write_json(
            &dir.join("Fight.json"),
            &json!({
                "contractName": "Fight",
                "sourceName": "contracts/Fight.sol",
                "abi": [],
                "bytecode": "0x6080"
            }),
        );
        write_json(
            &dir.join("Fight.dbg.json"),
            &json!({ "buildInfo": "../../build-info/abc.json" }),
        );
        write_json(
            &root.join("build-info/abc.json"),
            &json!({ "solcLongVersion": "0.8.7+commit.e28d00a7", "input": { "language": "Solidity" } }),
        );

        let store = ArtifactStore::new(&root);
        let artifact = store.load("Fight").unwrap();
        assert_eq!(artifact.fully_qualified_name(), "contracts/Fight.sol:Fight");
        assert_eq!(artifact.parsed_bytecode().unwrap().len(), 2);
        assert!(artifact.parsed_abi().unwrap().constructor.is_none());

        let info = store.build_info(&artifact).unwrap();
        assert_eq!(info.solc_long_version, "0.8.7+commit.e28d00a7");

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn missing_artifact_is_reported_by_name() {
        let store = ArtifactStore::new(scratch_dir());
        let err = store.load("Fight").unwrap_err();
        assert!(matches!(err, FightersError::ArtifactNotFound(name) if name == "Fight"));
    }

    #[test]
    fn empty_bytecode_cannot_be_deployed() {
        let artifact = ContractArtifact {
            contract_name: "IFight".to_string(),
            source_name: "contracts/IFight.sol".to_string(),
            abi: json!([]),
            bytecode: "0x".to_string(),
            path: PathBuf::from("IFight.json"),
        };
        assert!(artifact.parsed_bytecode().is_err());
    }
}
