use ethers::types::Address;

use crate::{
    config::{is_development_chain, network_config},
    contracts::MOCK_V3_AGGREGATOR,
    deployments::DeploymentSession,
    errors::{HarnessError, Result},
};

/// Picks the ETH/USD price feed FundMe is constructed with.
///
/// Development networks use the mock deployed earlier in the same session. Any
/// other network must have an entry in the static network table; a missing
/// entry is fatal for the deployment run.
pub fn resolve_price_feed(
    network_name: &str,
    chain_id: u64,
    session: &DeploymentSession,
) -> Result<Address> {
    if is_development_chain(network_name) {
        return Ok(session.get(MOCK_V3_AGGREGATOR)?.address);
    }

    network_config(chain_id)
        .map(|entry| entry.eth_usd_price_feed)
        .ok_or(HarnessError::MissingNetworkConfig(chain_id))
}
