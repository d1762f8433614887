use std::sync::Arc;

use ethers::{
    contract::abigen,
    providers::Middleware,
    types::{Address, TransactionReceipt, U256},
};

use crate::{
    contracts::FUND_ME,
    deployments::DeploymentSession,
    errors::{HarnessError, Result},
};

abigen!(
    FundMe,
    r#"[
        function fund() external payable
        function withdraw() external
        function cheaperWithdraw() external
        function s_priceFeed() external view returns (address)
        function addressToAmountFunded(address funder) external view returns (uint256)
        function funders(uint256 index) external view returns (address)
    ]"#
);

/// A FundMe instance at a known address.
pub struct FundMeDeployment {
    contract_address: Address,
}

impl FundMeDeployment {
    pub fn new(contract_address: Address) -> Self {
        Self { contract_address }
    }

    pub fn from_session(session: &DeploymentSession) -> Result<Self> {
        Ok(Self::new(session.get(FUND_ME)?.address))
    }

    pub fn address(&self) -> Address {
        self.contract_address
    }

    pub fn contract_with_client<T: Middleware>(&self, client: Arc<T>) -> FundMe<T> {
        FundMe::new(self.contract_address, client)
    }

    pub async fn fund(
        &self,
        signer: Arc<impl Middleware>,
        value: U256,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>> {
        let contract = self.contract_with_client(signer);

        let receipt = contract
            .fund()
            .value(value)
            .send()
            .await
            .map_err(HarnessError::contract)?
            .confirmations(confirmations)
            .await?;

        Ok(receipt)
    }

    /// Sends the whole balance to the owner, using `cheaperWithdraw` when `cheaper` is set.
    pub async fn withdraw(
        &self,
        signer: Arc<impl Middleware>,
        cheaper: bool,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>> {
        let contract = self.contract_with_client(signer);

        let call = if cheaper {
            contract.cheaper_withdraw()
        } else {
            contract.withdraw()
        };
        let receipt = call
            .send()
            .await
            .map_err(HarnessError::contract)?
            .confirmations(confirmations)
            .await?;

        Ok(receipt)
    }

    pub async fn price_feed(&self, client: Arc<impl Middleware>) -> Result<Address> {
        self.contract_with_client(client)
            .s_price_feed()
            .call()
            .await
            .map_err(HarnessError::contract)
    }

    pub async fn amount_funded(
        &self,
        client: Arc<impl Middleware>,
        funder: Address,
    ) -> Result<U256> {
        self.contract_with_client(client)
            .address_to_amount_funded(funder)
            .call()
            .await
            .map_err(HarnessError::contract)
    }

    pub async fn funder(&self, client: Arc<impl Middleware>, index: u64) -> Result<Address> {
        self.contract_with_client(client)
            .funders(U256::from(index))
            .call()
            .await
            .map_err(HarnessError::contract)
    }
}
