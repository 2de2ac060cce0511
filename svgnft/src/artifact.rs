use std::path::{Path, PathBuf};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::{error::DeployError, utils::hex_to_bytes};

pub const SVG_NFT_CONTRACT_NAME: &str = "SVGNFT";

const ARTIFACTS_DIR: &str = "artifacts/contracts";

/// Where hardhat writes the artifact of a contract living in `contracts/<name>.sol`.
pub fn default_artifact_path(contract_name: &str) -> PathBuf {
    Path::new(ARTIFACTS_DIR)
        .join(format!("{contract_name}.sol"))
        .join(format!("{contract_name}.json"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    abi: Abi,
    bytecode: String,
}

/// Compiled contract as emitted by the external build tool.
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub async fn load(path: &Path) -> Result<Self, DeployError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DeployError::ArtifactRead {
                path: path.to_owned(),
                source,
            })?;

        Self::from_json(path, &json)
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self, DeployError> {
        let format_err = |reason: String| DeployError::ArtifactFormat {
            path: path.to_owned(),
            reason,
        };

        let raw: RawArtifact = serde_json::from_str(json).map_err(|e| format_err(e.to_string()))?;

        let bytecode = hex_to_bytes(&raw.bytecode).map_err(format_err)?;
        if bytecode.is_empty() {
            // interfaces and abstract contracts compile to "0x"
            return Err(format_err(format!(
                "{} has no creation bytecode",
                raw.contract_name
            )));
        }

        Ok(Self {
            contract_name: raw.contract_name,
            abi: raw.abi,
            bytecode: bytecode.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "SVGNFT",
        "sourceName": "contracts/SVGNFT.sol",
        "abi": [
            {"inputs": [], "stateMutability": "nonpayable", "type": "constructor"},
            {
                "inputs": [{"internalType": "string", "name": "svg", "type": "string"}],
                "name": "create",
                "outputs": [],
                "stateMutability": "nonpayable",
                "type": "function"
            }
        ],
        "bytecode": "0x608060405234801561001057600080fd5b50",
        "deployedBytecode": "0x6080",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    #[test]
    fn test_default_artifact_path() {
        assert_eq!(
            default_artifact_path(SVG_NFT_CONTRACT_NAME),
            PathBuf::from("artifacts/contracts/SVGNFT.sol/SVGNFT.json")
        );
    }

    #[test]
    fn test_parse_hardhat_artifact() {
        let artifact = ContractArtifact::from_json(Path::new("SVGNFT.json"), ARTIFACT).unwrap();

        assert_eq!(artifact.contract_name, "SVGNFT");
        assert!(artifact.abi.function("create").is_ok());
        assert_eq!(artifact.bytecode.len(), 18);
    }

    #[test]
    fn test_artifact_without_bytecode_is_rejected() {
        let json = ARTIFACT.replace("0x608060405234801561001057600080fd5b50", "0x");

        let err = ContractArtifact::from_json(Path::new("SVGNFT.json"), &json).unwrap_err();
        assert!(matches!(err, DeployError::ArtifactFormat { .. }));
    }

    #[test]
    fn test_malformed_artifact_is_rejected() {
        let err = ContractArtifact::from_json(Path::new("SVGNFT.json"), "{}").unwrap_err();
        assert!(matches!(err, DeployError::ArtifactFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SVGNFT.json");

        let err = ContractArtifact::load(&path).await.unwrap_err();
        assert!(matches!(err, DeployError::ArtifactRead { .. }));
    }

    #[tokio::test]
    async fn test_load_artifact_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ARTIFACT.as_bytes()).unwrap();

        let artifact = ContractArtifact::load(file.path()).await.unwrap();
        assert_eq!(artifact.contract_name, "SVGNFT");
    }
}
