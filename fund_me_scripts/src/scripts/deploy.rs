use fund_me_deployments::{
    artifacts::Artifacts,
    deploy::{run_deploy_scripts, DeployContext},
    verify::EtherscanClient,
};

use crate::config::ScriptConfig;

pub async fn run(config: ScriptConfig, tags: &[String]) -> anyhow::Result<()> {
    let session = config.session()?;
    let artifacts = Artifacts::new(&config.harness.artifacts_dir);
    let etherscan = config
        .harness
        .etherscan_api_key
        .as_deref()
        .map(|key| EtherscanClient::new(key, config.harness.network.chain_id))
        .transpose()?;

    let mut ctx = DeployContext::new(config.client, session, artifacts, etherscan);
    run_deploy_scripts(&mut ctx, tags).await?;

    for name in ctx.session.names() {
        let record = ctx.session.get(name)?;
        println!("{name}: {:?}", record.address);
    }

    Ok(())
}
