use std::{fmt, path::PathBuf};

use ethers::types::{Address, H160};

use crate::errors::{HarnessError, Result};

const SEPOLIA_URL_ENV_VAR: &str = "SEPOLIA_URL";
const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
const MNEMONIC_ENV_VAR: &str = "MNEMONIC";
const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";
const ARTIFACTS_DIR_ENV_VAR: &str = "ARTIFACTS_DIR";
const DEPLOYMENTS_DIR_ENV_VAR: &str = "DEPLOYMENTS_DIR";

pub const DEFAULT_NETWORK: &str = "localhost";
const DEFAULT_ARTIFACTS_DIR: &str = "smart-contracts/artifacts";
const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
const LOCAL_CHAIN_ID: u64 = 31337;
const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Mnemonic behind the prefunded accounts of a Hardhat or Anvil node.
const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
const DEV_ACCOUNT_COUNT: u32 = 10;

const DEV_CONFIRMATIONS: usize = 1;
const PUBLIC_CONFIRMATIONS: usize = 6;

pub const DEVELOPMENT_CHAINS: [&str; 2] = ["hardhat", "localhost"];

/// Decimals of the mock ETH/USD price feed.
pub const DECIMALS: u8 = 8;
/// Initial answer of the mock price feed: 2000 USD at 8 decimals.
pub const INITIAL_ANSWER: i64 = 200_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfigEntry {
    pub chain_id: u64,
    pub name: &'static str,
    pub eth_usd_price_feed: Address,
}

/// Chainlink ETH/USD feeds of the public networks FundMe can be deployed to.
pub static NETWORK_CONFIG: [NetworkConfigEntry; 2] = [
    NetworkConfigEntry {
        chain_id: 11155111,
        name: "sepolia",
        // 0x694AA1769357215DE4FAC081bf1f309aDC325306
        eth_usd_price_feed: H160([
            0x69, 0x4a, 0xa1, 0x76, 0x93, 0x57, 0x21, 0x5d, 0xe4, 0xfa, 0xc0, 0x81, 0xbf, 0x1f,
            0x30, 0x9a, 0xdc, 0x32, 0x53, 0x06,
        ]),
    },
    NetworkConfigEntry {
        chain_id: 137,
        name: "polygon",
        // 0x0A6513e7bbe75b11479de347a8ef7E8CA0a0eb4B
        eth_usd_price_feed: H160([
            0x0a, 0x65, 0x13, 0xe7, 0xbb, 0xe7, 0x5b, 0x11, 0x47, 0x9d, 0xe3, 0x47, 0xa8, 0xef,
            0x7e, 0x8c, 0xa0, 0xa0, 0xeb, 0x4b,
        ]),
    },
];

pub fn network_config(chain_id: u64) -> Option<&'static NetworkConfigEntry> {
    NETWORK_CONFIG.iter().find(|entry| entry.chain_id == chain_id)
}

pub fn is_development_chain(network_name: &str) -> bool {
    DEVELOPMENT_CHAINS.iter().any(|chain| *chain == network_name)
}

/// Where the signing keys of a network come from.
#[derive(Clone, PartialEq, Eq)]
pub enum NetworkAccounts {
    Mnemonic { phrase: String, count: u32 },
    PrivateKeys(Vec<String>),
}

impl fmt::Debug for NetworkAccounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mnemonic { count, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"<redacted>")
                .field("count", count)
                .finish(),
            Self::PrivateKeys(keys) => f
                .debug_tuple("PrivateKeys")
                .field(&format_args!("<{} redacted>", keys.len()))
                .finish(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkSettings {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub accounts: NetworkAccounts,
}

impl NetworkSettings {
    /// Settings for a named network, reading secrets from the process env (and `.env`).
    pub fn load(name: &str) -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(name, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(name: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match name {
            "hardhat" | "localhost" => Ok(Self {
                name: name.to_owned(),
                chain_id: LOCAL_CHAIN_ID,
                rpc_url: LOCAL_RPC_URL.to_owned(),
                accounts: NetworkAccounts::Mnemonic {
                    phrase: lookup(MNEMONIC_ENV_VAR).unwrap_or_else(|| TEST_MNEMONIC.to_owned()),
                    count: DEV_ACCOUNT_COUNT,
                },
            }),
            "sepolia" => Ok(Self {
                name: name.to_owned(),
                chain_id: SEPOLIA_CHAIN_ID,
                rpc_url: lookup(SEPOLIA_URL_ENV_VAR).unwrap_or_default(),
                // no key configured means no signers on this network
                accounts: NetworkAccounts::PrivateKeys(
                    lookup(PRIVATE_KEY_ENV_VAR).into_iter().collect(),
                ),
            }),
            other => Err(HarnessError::UnknownNetwork(other.to_owned())),
        }
    }

    pub fn is_development(&self) -> bool {
        is_development_chain(&self.name)
    }

    /// Blocks to wait for after a deployment transaction.
    pub fn confirmations(&self) -> usize {
        if self.is_development() {
            DEV_CONFIRMATIONS
        } else {
            PUBLIC_CONFIRMATIONS
        }
    }
}

#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub network: NetworkSettings,
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,
    pub etherscan_api_key: Option<String>,
}

impl HarnessConfig {
    pub fn load(network: &str) -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(network, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(network: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network = NetworkSettings::from_lookup(network, &lookup)?;

        let artifacts_dir = lookup(ARTIFACTS_DIR_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_owned())
            .into();
        let deployments_dir = lookup(DEPLOYMENTS_DIR_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_DEPLOYMENTS_DIR.to_owned())
            .into();
        let etherscan_api_key = lookup(ETHERSCAN_API_KEY_ENV_VAR).filter(|key| !key.is_empty());

        Ok(Self {
            network,
            artifacts_dir,
            deployments_dir,
            etherscan_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_network_config_addresses() {
        let sepolia = network_config(11155111).unwrap();
        assert_eq!(sepolia.name, "sepolia");
        assert_eq!(
            sepolia.eth_usd_price_feed,
            "0x694AA1769357215DE4FAC081bf1f309aDC325306"
                .parse::<Address>()
                .unwrap()
        );

        let polygon = network_config(137).unwrap();
        assert_eq!(polygon.name, "polygon");
        assert_eq!(
            polygon.eth_usd_price_feed,
            "0x0A6513e7bbe75b11479de347a8ef7E8CA0a0eb4B"
                .parse::<Address>()
                .unwrap()
        );

        assert!(network_config(31337).is_none());
        assert!(network_config(1).is_none());
    }

    #[test]
    fn test_development_chains() {
        assert!(is_development_chain("hardhat"));
        assert!(is_development_chain("localhost"));
        assert!(!is_development_chain("sepolia"));
        assert!(!is_development_chain("Localhost"));
    }

    #[test]
    fn test_local_settings_use_test_mnemonic() {
        let settings = NetworkSettings::from_lookup("localhost", lookup_from(&[])).unwrap();
        assert_eq!(settings.chain_id, 31337);
        assert_eq!(settings.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(settings.confirmations(), 1);
        assert_eq!(
            settings.accounts,
            NetworkAccounts::Mnemonic {
                phrase: TEST_MNEMONIC.to_owned(),
                count: DEV_ACCOUNT_COUNT,
            }
        );
    }

    #[test]
    fn test_sepolia_settings_from_env() {
        let settings = NetworkSettings::from_lookup(
            "sepolia",
            lookup_from(&[("SEPOLIA_URL", "https://rpc.example"), ("PRIVATE_KEY", "0xabc")]),
        )
        .unwrap();
        assert_eq!(settings.chain_id, 11155111);
        assert_eq!(settings.rpc_url, "https://rpc.example");
        assert_eq!(settings.confirmations(), 6);
        assert_eq!(
            settings.accounts,
            NetworkAccounts::PrivateKeys(vec!["0xabc".to_owned()])
        );
    }

    #[test]
    fn test_sepolia_without_private_key_has_no_signers() {
        let settings = NetworkSettings::from_lookup("sepolia", lookup_from(&[])).unwrap();
        assert_eq!(settings.rpc_url, "");
        assert_eq!(settings.accounts, NetworkAccounts::PrivateKeys(vec![]));
    }

    #[test]
    fn test_unknown_network() {
        let err = NetworkSettings::from_lookup("mainnet", lookup_from(&[])).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownNetwork(name) if name == "mainnet"));
    }

    #[test]
    fn test_harness_config_paths_and_etherscan_key() {
        let config = HarnessConfig::from_lookup("localhost", lookup_from(&[])).unwrap();
        assert_eq!(config.artifacts_dir, PathBuf::from("smart-contracts/artifacts"));
        assert_eq!(config.deployments_dir, PathBuf::from("deployments"));
        assert!(config.etherscan_api_key.is_none());

        let config = HarnessConfig::from_lookup(
            "sepolia",
            lookup_from(&[
                ("ARTIFACTS_DIR", "/tmp/artifacts"),
                ("ETHERSCAN_API_KEY", "KEY"),
            ]),
        )
        .unwrap();
        assert_eq!(config.artifacts_dir, PathBuf::from("/tmp/artifacts"));
        assert_eq!(config.etherscan_api_key.as_deref(), Some("KEY"));

        let config =
            HarnessConfig::from_lookup("sepolia", lookup_from(&[("ETHERSCAN_API_KEY", "")]))
                .unwrap();
        assert!(config.etherscan_api_key.is_none());
    }

    #[test]
    fn test_accounts_debug_is_redacted() {
        let accounts = NetworkAccounts::PrivateKeys(vec!["0xsecret".to_owned()]);
        let printed = format!("{accounts:?}");
        assert!(!printed.contains("secret"));
    }
}
