pub mod fund_me;
pub mod mocks;

use ethers::{
    abi::Tokenize,
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes},
};
use tracing::{debug, info};

use crate::{
    artifacts::Artifacts,
    client::HarnessClient,
    deployments::{DeploymentRecord, DeploymentSession},
    errors::{HarnessError, Result},
    verify::EtherscanClient,
};

/// Everything a deploy script needs: the network, where records go, and where
/// compiled contracts come from.
pub struct DeployContext {
    pub client: HarnessClient,
    pub session: DeploymentSession,
    pub artifacts: Artifacts,
    /// Present only when an Etherscan API key is configured.
    pub etherscan: Option<EtherscanClient>,
}

impl DeployContext {
    pub fn new(
        client: HarnessClient,
        session: DeploymentSession,
        artifacts: Artifacts,
        etherscan: Option<EtherscanClient>,
    ) -> Self {
        Self {
            client,
            session,
            artifacts,
            etherscan,
        }
    }

    /// Deploys `contract_name` from the deployer account and records it.
    ///
    /// A contract already recorded in this session with the same constructor
    /// arguments, and with code at its address, is reused instead of redeployed.
    pub async fn deploy<T: Tokenize>(
        &mut self,
        contract_name: &str,
        args: T,
        confirmations: usize,
    ) -> Result<DeploymentRecord> {
        let artifact = self.artifacts.load(contract_name)?;
        let tokens = args.into_tokens();
        let encoded_args = Bytes::from(ethers::abi::encode(&tokens));

        if let Some(existing) = self.session.get_optional(contract_name) {
            let same_args = matches!(existing.constructor_args(), Ok(args) if args == encoded_args);
            if same_args && self.has_code(existing.address).await? {
                info!("reusing \"{contract_name}\" at {:?}", existing.address);
                return Ok(existing.clone());
            }
        }

        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode,
            self.client.deployer()?,
        );
        let (contract, receipt) = factory
            .deploy_tokens(tokens.clone())
            .map_err(HarnessError::contract)?
            .confirmations(confirmations)
            .send_with_receipt()
            .await
            .map_err(HarnessError::contract)?;

        info!(
            "deploying \"{contract_name}\" (tx: {:?})...: deployed at {:?} with {} gas",
            receipt.transaction_hash,
            contract.address(),
            receipt.gas_used.unwrap_or_default()
        );

        let record = DeploymentRecord::new(
            contract_name,
            contract.address(),
            artifact.abi,
            Some(receipt.transaction_hash),
            &tokens,
        );
        self.session.save(record.clone())?;

        Ok(record)
    }

    async fn has_code(&self, address: Address) -> Result<bool> {
        let code = self.client.provider().get_code(address, None).await?;
        Ok(!code.is_empty())
    }
}

/// The deploy scripts, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployScript {
    Mocks,
    FundMe,
}

impl DeployScript {
    pub const ALL: [DeployScript; 2] = [DeployScript::Mocks, DeployScript::FundMe];

    pub fn tags(self) -> &'static [&'static str] {
        match self {
            DeployScript::Mocks => &["all", "mocks"],
            DeployScript::FundMe => &["all", "fundme"],
        }
    }

    /// No tags selects every script.
    pub fn matches<S: AsRef<str>>(self, tags: &[S]) -> bool {
        tags.is_empty()
            || tags
                .iter()
                .any(|tag| self.tags().iter().any(|own| *own == tag.as_ref()))
    }

    pub async fn run(self, ctx: &mut DeployContext) -> Result<()> {
        match self {
            DeployScript::Mocks => mocks::deploy_mocks(ctx).await,
            DeployScript::FundMe => fund_me::deploy_fund_me(ctx).await,
        }
    }
}

pub async fn run_deploy_scripts<S: AsRef<str>>(
    ctx: &mut DeployContext,
    tags: &[S],
) -> Result<()> {
    for script in DeployScript::ALL.into_iter().filter(|script| script.matches(tags)) {
        debug!(?script, network = ctx.session.network(), "running deploy script");
        script.run(ctx).await?;
    }
    Ok(())
}

/// Runs the tagged scripts against a fresh in-memory session, so every caller
/// gets its own deployments regardless of what the node already holds.
pub async fn fixture<S: AsRef<str>>(
    client: HarnessClient,
    artifacts: Artifacts,
    tags: &[S],
) -> Result<DeployContext> {
    let session = DeploymentSession::in_memory(client.network().name.clone());
    let mut ctx = DeployContext::new(client, session, artifacts, None);

    run_deploy_scripts(&mut ctx, tags).await?;

    Ok(ctx)
}
