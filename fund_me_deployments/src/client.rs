use std::{sync::Arc, time::Duration};

use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer, Wallet},
};

use crate::{
    config::{NetworkAccounts, NetworkSettings},
    errors::{HarnessError, Result},
};

/// Local nodes mine on demand, so poll receipts far more often than the ethers default.
const LOCAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

/// A provider for one network plus the signers configured for it.
pub struct HarnessClient {
    network: NetworkSettings,
    provider: Arc<Provider<Http>>,
    signers: Vec<Arc<EtherSigner>>,
}

impl HarnessClient {
    pub fn connect(network: &NetworkSettings) -> Result<Self> {
        let mut provider = Provider::<Http>::try_from(network.rpc_url.as_str())?;
        if network.is_development() {
            provider = provider.interval(LOCAL_POLL_INTERVAL);
        }

        let signers = wallets(&network.accounts, network.chain_id)?
            .into_iter()
            .map(|wallet| Arc::new(SignerMiddleware::new(provider.clone(), wallet)))
            .collect();

        Ok(Self {
            network: network.clone(),
            provider: Arc::new(provider),
            signers,
        })
    }

    pub fn network(&self) -> &NetworkSettings {
        &self.network
    }

    /// Read-only client.
    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    pub fn signers(&self) -> &[Arc<EtherSigner>] {
        &self.signers
    }

    pub fn signer(&self, index: usize) -> Result<Arc<EtherSigner>> {
        self.signers
            .get(index)
            .cloned()
            .ok_or(HarnessError::NoSigner(index))
    }

    /// The `deployer` named account: always the first signer.
    pub fn deployer(&self) -> Result<Arc<EtherSigner>> {
        self.signer(0)
    }
}

fn wallets(accounts: &NetworkAccounts, chain_id: u64) -> Result<Vec<LocalWallet>> {
    match accounts {
        NetworkAccounts::Mnemonic { phrase, count } => (0..*count)
            .map(|index| -> Result<LocalWallet> {
                let wallet = MnemonicBuilder::<English>::default()
                    .phrase(phrase.as_str())
                    .index(index)?
                    .build()?
                    .with_chain_id(chain_id);
                Ok(wallet)
            })
            .collect(),
        NetworkAccounts::PrivateKeys(keys) => keys
            .iter()
            .map(|key| -> Result<LocalWallet> {
                let wallet = key
                    .trim_start_matches("0x")
                    .parse::<LocalWallet>()?
                    .with_chain_id(chain_id);
                Ok(wallet)
            })
            .collect(),
    }
}
