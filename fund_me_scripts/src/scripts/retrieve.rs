use ethers::types::{Address, U256};
use fund_me_deployments::contracts::{simple_storage::SimpleStorageDeployment, SIMPLE_STORAGE};

use crate::config::ScriptConfig;

const NEW_VALUE: u64 = 7;

pub async fn run(config: &ScriptConfig, address: Option<Address>) -> anyhow::Result<()> {
    let simple_storage =
        SimpleStorageDeployment::new(config.deployed_address(SIMPLE_STORAGE, address)?);
    let signer = config.client.deployer()?;

    let current_value = simple_storage.retrieve(signer.clone()).await?;
    println!("Current Value is: {current_value}");

    simple_storage
        .store(signer.clone(), U256::from(NEW_VALUE), 1)
        .await?;

    let updated_value = simple_storage.retrieve(signer).await?;
    println!("Updated Value is: {updated_value}");

    Ok(())
}
