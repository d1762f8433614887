use fund_me_deployments::{
    artifacts::Artifacts,
    verify::{verify, EtherscanClient},
};
use tracing::warn;

use crate::config::ScriptConfig;

pub async fn run(config: &ScriptConfig, contract_name: &str) -> anyhow::Result<()> {
    let Some(api_key) = config.harness.etherscan_api_key.as_deref() else {
        warn!("ETHERSCAN_API_KEY is not set, skipping verification");
        return Ok(());
    };

    let session = config.session()?;
    let record = session.get(contract_name)?;
    let etherscan = EtherscanClient::new(api_key, config.harness.network.chain_id)?;
    let artifacts = Artifacts::new(&config.harness.artifacts_dir);

    verify(&etherscan, &artifacts, record).await;

    Ok(())
}
