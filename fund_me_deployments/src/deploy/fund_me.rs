use tracing::info;

use crate::{
    contracts::FUND_ME,
    deploy::DeployContext,
    errors::Result,
    network::resolve_price_feed,
    verify::verify,
};

/// Deploys FundMe against the network's price feed, then verifies it on
/// public networks when an Etherscan key is configured.
pub async fn deploy_fund_me(ctx: &mut DeployContext) -> Result<()> {
    let network = ctx.client.network();
    let is_development = network.is_development();
    let confirmations = network.confirmations();

    let price_feed = resolve_price_feed(&network.name, network.chain_id, &ctx.session)?;

    let fund_me = ctx.deploy(FUND_ME, price_feed, confirmations).await?;
    info!("FundMe deployed to: {:?}", fund_me.address);

    if !is_development {
        if let Some(etherscan) = &ctx.etherscan {
            verify(etherscan, &ctx.artifacts, &fund_me).await;
        }
    }

    Ok(())
}
