use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use fund_me_deployments::contracts::FUND_ME;

use crate::config::ScriptConfig;

/// Prints the FundMe balance, then those of signers 0 and 1, in wei.
pub async fn run(config: &ScriptConfig, address: Option<Address>) -> anyhow::Result<()> {
    let fund_me_address = config.deployed_address(FUND_ME, address)?;
    let provider = config.client.provider();

    let balance = provider.get_balance(fund_me_address, None).await?;
    println!("{}", balance_line("FundMe", fund_me_address, balance));

    for index in 0..2 {
        let signer = config.client.signer(index)?;
        let balance = provider.get_balance(signer.address(), None).await?;
        println!(
            "{}",
            balance_line(&format!("Signer {index}"), signer.address(), balance)
        );
    }

    Ok(())
}

fn balance_line(label: &str, address: Address, balance: U256) -> String {
    format!("{label} {address:?}: {balance}")
}
