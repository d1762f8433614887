use ethers::types::{I256, U256};
use tracing::info;

use crate::{
    config::{DECIMALS, INITIAL_ANSWER},
    contracts::MOCK_V3_AGGREGATOR,
    deploy::DeployContext,
    errors::Result,
};

/// Deploys the stand-in price feed. A no-op outside development networks.
pub async fn deploy_mocks(ctx: &mut DeployContext) -> Result<()> {
    let network = ctx.client.network();
    if !network.is_development() {
        return Ok(());
    }
    let confirmations = network.confirmations();

    info!("local network detected, deploying mocks...");
    ctx.deploy(
        MOCK_V3_AGGREGATOR,
        (U256::from(DECIMALS), I256::from(INITIAL_ANSWER)),
        confirmations,
    )
    .await?;
    info!("Mocks deployed!");

    Ok(())
}
