pub mod fund_me;
pub mod mock_v3_aggregator;
pub mod simple_storage;

use ethers::{contract::ContractError, providers::Middleware, utils::id};

pub const FUND_ME: &str = "FundMe";
pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
pub const SIMPLE_STORAGE: &str = "SimpleStorage";

/// Custom errors declared by the contracts, by signature.
const CUSTOM_ERRORS: &[&str] = &["FundMe__NotOwner()"];

/// Why a contract reverted: the `Error(string)` reason, or the name of a
/// known custom error.
pub fn revert_reason<M: Middleware>(err: &ContractError<M>) -> Option<String> {
    err.decode_revert::<String>()
        .or_else(|| err.as_revert().and_then(|data| custom_error_name(data)))
        .or_else(|| reason_from_message(&err.to_string()))
}

fn custom_error_name(data: &[u8]) -> Option<String> {
    let selector = data.get(..4)?;
    CUSTOM_ERRORS
        .iter()
        .find(|signature| id(signature).as_slice() == selector)
        .map(|signature| error_name(signature))
}

fn error_name(signature: &str) -> String {
    signature
        .split_once('(')
        .map_or(signature, |(name, _)| name)
        .to_owned()
}

/// Nodes that fail gas estimation only report the reason inside the rpc error message.
fn reason_from_message(message: &str) -> Option<String> {
    const HARDHAT_PREFIX: &str = "reverted with reason string '";
    const HARDHAT_CUSTOM_PREFIX: &str = "reverted with custom error '";
    const GETH_PREFIX: &str = "execution reverted: ";

    if let Some(start) = message.find(HARDHAT_PREFIX) {
        let rest = &message[start + HARDHAT_PREFIX.len()..];
        return rest.find('\'').map(|end| rest[..end].to_owned());
    }

    if let Some(start) = message.find(HARDHAT_CUSTOM_PREFIX) {
        let rest = &message[start + HARDHAT_CUSTOM_PREFIX.len()..];
        return rest.find('\'').map(|end| error_name(&rest[..end]));
    }

    message.find(GETH_PREFIX).map(|start| {
        let rest = &message[start + GETH_PREFIX.len()..];
        // ethers renders rpc errors as `(code: .., message: .., data: ..)`
        let end = rest.find(", data:").unwrap_or(rest.len());
        rest[..end].to_owned()
    })
}
