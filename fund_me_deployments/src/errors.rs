use std::path::PathBuf;

use ethers::{
    contract::ContractError,
    providers::{Middleware, ProviderError},
    signers::WalletError,
};

use crate::contracts::revert_reason;

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown network \"{0}\"")]
    UnknownNetwork(String),
    #[error("no network config for chain id {0}")]
    MissingNetworkConfig(u64),
    #[error("no deployment found for \"{0}\"")]
    MissingDeployment(String),
    #[error("no artifact found for \"{0}\"")]
    ArtifactNotFound(String),
    #[error(
        "multiple artifacts named \"{name}\", use a fully qualified name: {}",
        candidates.join(", ")
    )]
    AmbiguousArtifact {
        name: String,
        candidates: Vec<String>,
    },
    #[error("no build info found for source \"{0}\"")]
    BuildInfoNotFound(String),
    #[error("no signer at index {0}")]
    NoSigner(usize),
    #[error("invalid rpc url: {0}")]
    RpcUrl(#[from] url::ParseError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("contract call failed: {message}")]
    Contract {
        message: String,
        revert: Option<String>,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("invalid constructor arguments: {0}")]
    Abi(#[from] ethers::abi::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("verification failed: {0}")]
    Verification(String),
}

impl HarnessError {
    pub fn contract<M: Middleware>(err: ContractError<M>) -> Self {
        Self::Contract {
            revert: revert_reason(&err),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Revert string reported by the contract, when the failure was a revert.
    pub fn revert(&self) -> Option<&str> {
        match self {
            Self::Contract { revert, .. } => revert.as_deref(),
            _ => None,
        }
    }
}
