use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, ParamType, Token,
    },
    types::{Address, Bytes, H256, I256},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::HarnessConfig,
    errors::{HarnessError, Result},
};

/// The network whose chain lives only as long as one run: nothing is persisted for it.
const EPHEMERAL_NETWORK: &str = "hardhat";

/// One deployed contract, stored the way `hardhat-deploy` stores it.
///
/// Files written by `hardhat-deploy` itself load as well. They carry no name
/// (it comes from the file stem) and no encoded constructor arguments (they are
/// rebuilt from `args` and the constructor in `abi`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(skip)]
    pub contract_name: String,
    pub address: Address,
    pub abi: Abi,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    /// Constructor arguments as JSON values.
    #[serde(default)]
    pub args: Vec<Value>,
    /// ABI-encoded constructor arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_args: Option<Bytes>,
}

impl DeploymentRecord {
    pub fn new(
        contract_name: impl Into<String>,
        address: Address,
        abi: Abi,
        transaction_hash: Option<H256>,
        args: &[Token],
    ) -> Self {
        Self {
            contract_name: contract_name.into(),
            address,
            abi,
            transaction_hash,
            args: args.iter().map(token_to_json).collect(),
            encoded_args: Some(Bytes::from(ethers::abi::encode(args))),
        }
    }

    /// ABI-encoded constructor arguments, as sent after the creation bytecode.
    pub fn constructor_args(&self) -> Result<Bytes> {
        if let Some(encoded) = &self.encoded_args {
            return Ok(encoded.clone());
        }

        let params = self
            .abi
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();
        if params.len() != self.args.len() {
            return Err(HarnessError::Abi(ethers::abi::Error::InvalidData));
        }

        let tokens = params
            .iter()
            .zip(&self.args)
            .map(|(param, value)| json_to_token(&param.kind, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bytes::from(ethers::abi::encode(&tokens)))
    }
}

fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(address) => Value::String(format!("{address:?}")),
        Token::Uint(value) => Value::String(value.to_string()),
        Token::Int(value) => Value::String(I256::from_raw(*value).to_string()),
        Token::Bool(value) => Value::Bool(*value),
        Token::String(value) => Value::String(value.clone()),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => {
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
        Token::Array(tokens) | Token::FixedArray(tokens) | Token::Tuple(tokens) => {
            Value::Array(tokens.iter().map(token_to_json).collect())
        }
    }
}

fn json_to_token(kind: &ParamType, value: &Value) -> Result<Token> {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let text = match kind {
        ParamType::Address | ParamType::Bytes | ParamType::FixedBytes(_) => {
            text.trim_start_matches("0x").to_owned()
        }
        _ => text,
    };
    Ok(LenientTokenizer::tokenize(kind, &text)?)
}

/// Deployment records of one network, keyed by contract name.
///
/// Persistent sessions mirror every record to `<dir>/<network>/<Name>.json`, the
/// layout `hardhat-deploy` uses, so a later run can look contracts up by name.
#[derive(Debug)]
pub struct DeploymentSession {
    network: String,
    dir: Option<PathBuf>,
    records: BTreeMap<String, DeploymentRecord>,
}

impl DeploymentSession {
    pub fn in_memory(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            dir: None,
            records: BTreeMap::new(),
        }
    }

    /// Loads every record under `<root>/<network>`.
    ///
    /// A file that is not a deployment record is skipped with a warning.
    pub fn persistent(root: impl AsRef<Path>, network: impl Into<String>) -> Result<Self> {
        let network = network.into();
        let dir = root.as_ref().join(&network);
        let mut records = BTreeMap::new();

        if dir.is_dir() {
            let entries = fs::read_dir(&dir).map_err(|e| HarnessError::io(&dir, e))?;
            for entry in entries {
                let path = entry.map_err(|e| HarnessError::io(&dir, e))?.path();
                if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                    continue;
                }
                let Some(contract_name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };

                let content = fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
                let mut record: DeploymentRecord = match serde_json::from_str(&content) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(path = %path.display(), "skipping unreadable deployment: {e}");
                        continue;
                    }
                };
                record.contract_name = contract_name.to_owned();

                debug!(
                    contract = %record.contract_name,
                    address = ?record.address,
                    "loaded deployment"
                );
                records.insert(record.contract_name.clone(), record);
            }
        }

        Ok(Self {
            network,
            dir: Some(dir),
            records,
        })
    }

    /// Opens the session for the configured network.
    pub fn open(config: &HarnessConfig) -> Result<Self> {
        if config.network.name == EPHEMERAL_NETWORK {
            Ok(Self::in_memory(EPHEMERAL_NETWORK))
        } else {
            Self::persistent(&config.deployments_dir, config.network.name.clone())
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn get(&self, contract_name: &str) -> Result<&DeploymentRecord> {
        self.get_optional(contract_name)
            .ok_or_else(|| HarnessError::MissingDeployment(contract_name.to_owned()))
    }

    pub fn get_optional(&self, contract_name: &str) -> Option<&DeploymentRecord> {
        self.records.get(contract_name)
    }

    pub fn save(&mut self, record: DeploymentRecord) -> Result<()> {
        if let Some(dir) = &self.dir {
            fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))?;
            let path = dir.join(format!("{}.json", record.contract_name));
            let content = serde_json::to_string_pretty(&record)?;
            fs::write(&path, content).map_err(|e| HarnessError::io(&path, e))?;
        }

        self.records.insert(record.contract_name.clone(), record);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}
