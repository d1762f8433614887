mod config;
mod scripts;

use clap::{Parser, Subcommand};
use ethers::types::Address;
use fund_me_deployments::config::DEFAULT_NETWORK;
use tracing_subscriber::EnvFilter;

use crate::config::ScriptConfig;

/// Deploy and interact with the FundMe contracts.
#[derive(Debug, Parser)]
#[command(name = "fund-me", version)]
struct Cli {
    /// Network to run against: hardhat, localhost or sepolia.
    #[arg(long, global = true, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    network: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the deploy scripts whose tags match.
    Deploy {
        #[arg(long, value_delimiter = ',', default_value = "all")]
        tags: Vec<String>,
    },
    /// Fund the FundMe contract from one of the signers.
    Fund {
        /// Defaults to the recorded FundMe deployment.
        #[arg(long)]
        address: Option<Address>,
        #[arg(long, default_value_t = 1)]
        signer: usize,
        /// Amount in ETH.
        #[arg(long, default_value = "0.1")]
        amount: String,
    },
    /// Withdraw every funded wei to the owner.
    Withdraw {
        #[arg(long)]
        address: Option<Address>,
        /// Use `cheaperWithdraw`.
        #[arg(long)]
        cheaper: bool,
    },
    /// Print the balances of FundMe and of the first two signers.
    CheckBalance {
        #[arg(long)]
        address: Option<Address>,
    },
    /// Read SimpleStorage, store 7, and read it again.
    Retrieve {
        /// Defaults to the recorded SimpleStorage deployment.
        #[arg(long)]
        address: Option<Address>,
    },
    /// Print chain, signer and fee information.
    NetworkInfo,
    /// Verify a recorded deployment on Etherscan.
    Verify {
        #[arg(long, default_value = "FundMe")]
        contract: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScriptConfig::load(&cli.network)?;

    match cli.command {
        Command::Deploy { tags } => scripts::deploy::run(config, &tags).await,
        Command::Fund {
            address,
            signer,
            amount,
        } => scripts::fund::run(&config, address, signer, &amount).await,
        Command::Withdraw { address, cheaper } => {
            scripts::withdraw::run(&config, address, cheaper).await
        }
        Command::CheckBalance { address } => scripts::check_balance::run(&config, address).await,
        Command::Retrieve { address } => scripts::retrieve::run(&config, address).await,
        Command::NetworkInfo => scripts::network_info::run(&config).await,
        Command::Verify { contract } => scripts::verify::run(&config, &contract).await,
    }
}
