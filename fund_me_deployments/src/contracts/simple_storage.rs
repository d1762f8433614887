use std::sync::Arc;

use ethers::{
    contract::abigen,
    providers::Middleware,
    types::{Address, TransactionReceipt, U256},
};

use crate::errors::{HarnessError, Result};

abigen!(
    SimpleStorage,
    r#"[
        function retrieve() external view returns (uint256)
        function store(uint256 favoriteNumber) external
    ]"#
);

pub struct SimpleStorageDeployment {
    contract_address: Address,
}

impl SimpleStorageDeployment {
    pub fn new(contract_address: Address) -> Self {
        Self { contract_address }
    }

    pub fn address(&self) -> Address {
        self.contract_address
    }

    pub fn contract_with_client<T: Middleware>(&self, client: Arc<T>) -> SimpleStorage<T> {
        SimpleStorage::new(self.contract_address, client)
    }

    pub async fn retrieve(&self, client: Arc<impl Middleware>) -> Result<U256> {
        self.contract_with_client(client)
            .retrieve()
            .call()
            .await
            .map_err(HarnessError::contract)
    }

    pub async fn store(
        &self,
        signer: Arc<impl Middleware>,
        value: U256,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>> {
        let receipt = self
            .contract_with_client(signer)
            .store(value)
            .send()
            .await
            .map_err(HarnessError::contract)?
            .confirmations(confirmations)
            .await?;

        Ok(receipt)
    }
}
