use ethers::{
    providers::Middleware,
    types::Chain,
    utils::{format_ether, format_units},
};

use crate::config::ScriptConfig;

const SHOWN_SIGNERS: usize = 3;

pub async fn run(config: &ScriptConfig) -> anyhow::Result<()> {
    let provider = config.client.provider();
    let network = config.client.network();

    println!("=== Network ===");
    let chain_id = provider.get_chainid().await?;
    println!("Chain id: {chain_id}");
    let chain_name = Chain::try_from(chain_id.as_u64())
        .map(|chain| chain.to_string())
        .unwrap_or_else(|_| "unknown".to_owned());
    println!("Network name: {} ({chain_name})", network.name);
    let block_number = provider.get_block_number().await?;
    println!("Block number: {block_number}");

    println!("\n=== Signers ===");
    let signers = config.client.signers();
    println!("Signer count: {}", signers.len());
    for (index, signer) in signers.iter().take(SHOWN_SIGNERS).enumerate() {
        let balance = provider.get_balance(signer.address(), None).await?;
        println!("\nSigner {index}:");
        println!("  Address: {:?}", signer.address());
        println!("  Balance: {} ETH", format_ether(balance));
    }

    println!("\n=== Provider ===");
    println!("Provider type: Http ({})", network.rpc_url);
    let gas_price = provider.get_gas_price().await?;
    println!("Gas price: {} gwei", format_units(gas_price, "gwei")?);

    Ok(())
}
