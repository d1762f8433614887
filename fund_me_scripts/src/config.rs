use anyhow::Context;
use ethers::types::Address;
use fund_me_deployments::{
    client::HarnessClient, config::HarnessConfig, deployments::DeploymentSession,
};
use tracing::info;

pub struct ScriptConfig {
    pub harness: HarnessConfig,
    pub client: HarnessClient,
}

impl ScriptConfig {
    pub fn load(network: &str) -> anyhow::Result<Self> {
        let harness = HarnessConfig::load(network)?;
        let client = HarnessClient::connect(&harness.network)
            .with_context(|| format!("connecting to network \"{network}\""))?;
        info!(
            network = %harness.network.name,
            chain_id = harness.network.chain_id,
            signers = client.signers().len(),
            "loaded network config"
        );

        Ok(Self { harness, client })
    }

    pub fn session(&self) -> anyhow::Result<DeploymentSession> {
        Ok(DeploymentSession::open(&self.harness)?)
    }

    /// An explicit address wins; otherwise use the address recorded for `contract_name`.
    pub fn deployed_address(
        &self,
        contract_name: &str,
        explicit: Option<Address>,
    ) -> anyhow::Result<Address> {
        if let Some(address) = explicit {
            return Ok(address);
        }

        let session = self.session()?;
        let record = session.get(contract_name).with_context(|| {
            format!(
                "deploy {contract_name} to \"{}\" first or pass --address",
                session.network()
            )
        })?;
        Ok(record.address)
    }
}
