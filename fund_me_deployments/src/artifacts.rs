use std::{
    fs,
    path::{Path, PathBuf},
};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::errors::{HarnessError, Result};

const BUILD_INFO_DIR: &str = "build-info";

/// A compiled contract as written by `hardhat compile`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl HardhatArtifact {
    /// Fully qualified name, e.g. `contracts/FundMe.sol:FundMe`.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

/// The compiler input and version that produced a set of artifacts.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    pub input: serde_json::Value,
}

impl BuildInfo {
    pub fn contains_source(&self, source_name: &str) -> bool {
        self.input
            .get("sources")
            .and_then(|sources| sources.get(source_name))
            .is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads an artifact by bare name (`FundMe`) or fully qualified name
    /// (`contracts/FundMe.sol:FundMe`). A bare name must be unique.
    pub fn load(&self, contract_name: &str) -> Result<HardhatArtifact> {
        if let Some((source_name, name)) = contract_name.split_once(':') {
            let path = self.root.join(source_name).join(format!("{name}.json"));
            if !path.is_file() {
                return Err(HarnessError::ArtifactNotFound(contract_name.to_owned()));
            }
            return read_json(&path);
        }

        let file_name = format!("{contract_name}.json");
        let mut found = Vec::new();
        find_files(&self.root, &file_name, &mut found)?;

        match found.len() {
            0 => Err(HarnessError::ArtifactNotFound(contract_name.to_owned())),
            1 => read_json(&found[0]),
            _ => Err(HarnessError::AmbiguousArtifact {
                name: contract_name.to_owned(),
                candidates: found
                    .iter()
                    .map(|path| self.qualified_name(path, contract_name))
                    .collect(),
            }),
        }
    }

    fn qualified_name(&self, path: &Path, contract_name: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .unwrap_or(path);
        format!("{}:{contract_name}", source.display())
    }

    pub fn build_info_for(&self, source_name: &str) -> Result<BuildInfo> {
        let dir = self.root.join(BUILD_INFO_DIR);
        let entries = fs::read_dir(&dir).map_err(|e| HarnessError::io(&dir, e))?;

        for entry in entries {
            let path = entry.map_err(|e| HarnessError::io(&dir, e))?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let build_info: BuildInfo = read_json(&path)?;
            if build_info.contains_source(source_name) {
                return Ok(build_info);
            }
        }

        Err(HarnessError::BuildInfoNotFound(source_name.to_owned()))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Collects every `file_name` under `dir`, skipping the build info directory.
fn find_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .map_err(|e| HarnessError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| HarnessError::io(dir, e))?;
    // keep the search order stable across platforms
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if path.file_name().map_or(false, |name| name == BUILD_INFO_DIR) {
                continue;
            }
            find_files(&path, file_name, found)?;
        } else if path.file_name().map_or(false, |name| name == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    fn write_json(path: &Path, value: &serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn artifact_json(contract_name: &str, source_name: &str) -> serde_json::Value {
        json!({
            "_format": "hh-sol-artifact-1",
            "contractName": contract_name,
            "sourceName": source_name,
            "abi": [
                {
                    "inputs": [],
                    "name": "retrieve",
                    "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
                    "stateMutability": "view",
                    "type": "function"
                }
            ],
            "bytecode": "0x6080604052",
            "deployedBytecode": "0x6080",
            "linkReferences": {},
            "deployedLinkReferences": {}
        })
    }

    #[test]
    fn test_load_nested_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_json(
            &root.join("contracts/test/MockV3Aggregator.sol/MockV3Aggregator.dbg.json"),
            &json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc.json" }),
        );
        write_json(
            &root.join("contracts/test/MockV3Aggregator.sol/MockV3Aggregator.json"),
            &artifact_json("MockV3Aggregator", "contracts/test/MockV3Aggregator.sol"),
        );

        let artifacts = Artifacts::new(root);
        let artifact = artifacts.load("MockV3Aggregator").unwrap();

        assert_eq!(artifact.contract_name, "MockV3Aggregator");
        assert_eq!(
            artifact.fully_qualified_name(),
            "contracts/test/MockV3Aggregator.sol:MockV3Aggregator"
        );
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.function("retrieve").is_ok());
    }

    #[test]
    fn test_duplicate_artifact_names_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let chainlink_source = "@chainlink/contracts/src/v0.8/tests/MockV3Aggregator.sol";
        write_json(
            &root.join(chainlink_source).join("MockV3Aggregator.json"),
            &artifact_json("MockV3Aggregator", chainlink_source),
        );
        write_json(
            &root.join("contracts/test/MockV3Aggregator.sol/MockV3Aggregator.json"),
            &artifact_json("MockV3Aggregator", "contracts/test/MockV3Aggregator.sol"),
        );

        let artifacts = Artifacts::new(root);
        match artifacts.load("MockV3Aggregator").unwrap_err() {
            HarnessError::AmbiguousArtifact { name, candidates } => {
                assert_eq!(name, "MockV3Aggregator");
                assert_eq!(
                    candidates,
                    vec![
                        format!("{chainlink_source}:MockV3Aggregator"),
                        "contracts/test/MockV3Aggregator.sol:MockV3Aggregator".to_owned(),
                    ]
                );
            }
            other => panic!("expected an ambiguous artifact, got {other}"),
        }

        let artifact = artifacts
            .load("contracts/test/MockV3Aggregator.sol:MockV3Aggregator")
            .unwrap();
        assert_eq!(artifact.source_name, "contracts/test/MockV3Aggregator.sol");
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifacts::new(dir.path()).load("FundMe").unwrap_err();
        assert!(matches!(err, HarnessError::ArtifactNotFound(name) if name == "FundMe"));

        let err = Artifacts::new(dir.path().join("missing"))
            .load("FundMe")
            .unwrap_err();
        assert!(matches!(err, HarnessError::ArtifactNotFound(_)));

        let err = Artifacts::new(dir.path())
            .load("contracts/FundMe.sol:FundMe")
            .unwrap_err();
        assert!(matches!(err, HarnessError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_build_info_for_source() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_json(
            &root.join("build-info/aaa.json"),
            &json!({
                "solcLongVersion": "0.8.28+commit.7893614a",
                "input": { "language": "Solidity", "sources": { "contracts/SimpleStorage.sol": { "content": "" } } },
                "output": {}
            }),
        );
        write_json(
            &root.join("build-info/bbb.json"),
            &json!({
                "solcLongVersion": "0.8.28+commit.7893614a",
                "input": { "language": "Solidity", "sources": { "contracts/FundMe.sol": { "content": "contract FundMe {}" } } },
                "output": {}
            }),
        );

        let artifacts = Artifacts::new(root);
        let build_info = artifacts.build_info_for("contracts/FundMe.sol").unwrap();
        assert_eq!(build_info.solc_long_version, "0.8.28+commit.7893614a");
        assert!(build_info.contains_source("contracts/FundMe.sol"));

        let err = artifacts
            .build_info_for("contracts/Missing.sol")
            .unwrap_err();
        assert!(matches!(err, HarnessError::BuildInfoNotFound(_)));
    }
}
