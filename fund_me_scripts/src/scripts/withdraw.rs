use ethers::types::Address;
use fund_me_deployments::contracts::{fund_me::FundMeDeployment, FUND_ME};

use crate::config::ScriptConfig;

pub async fn run(
    config: &ScriptConfig,
    address: Option<Address>,
    cheaper: bool,
) -> anyhow::Result<()> {
    let fund_me = FundMeDeployment::new(config.deployed_address(FUND_ME, address)?);

    println!("Withdrawing...");
    let receipt = fund_me.withdraw(config.client.deployer()?, cheaper, 1).await?;
    if let Some(receipt) = receipt {
        println!(
            "Withdrawn in tx {:?} ({} gas)",
            receipt.transaction_hash,
            receipt.gas_used.unwrap_or_default()
        );
    }

    Ok(())
}
