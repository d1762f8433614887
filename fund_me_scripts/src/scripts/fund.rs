use ethers::{types::Address, utils::parse_ether};
use fund_me_deployments::contracts::{fund_me::FundMeDeployment, FUND_ME};

use crate::config::ScriptConfig;

pub async fn run(
    config: &ScriptConfig,
    address: Option<Address>,
    signer: usize,
    amount: &str,
) -> anyhow::Result<()> {
    let fund_me = FundMeDeployment::new(config.deployed_address(FUND_ME, address)?);
    let value = parse_ether(amount)?;

    println!("Funding...");
    fund_me.fund(config.client.signer(signer)?, value, 1).await?;
    println!("Funded!");

    Ok(())
}
