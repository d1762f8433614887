use std::sync::Arc;

use ethers::{
    contract::abigen,
    providers::Middleware,
    types::{Address, I256},
};

use crate::{
    contracts::MOCK_V3_AGGREGATOR,
    deployments::DeploymentSession,
    errors::{HarnessError, Result},
};

abigen!(
    MockV3Aggregator,
    r#"[
        function decimals() external view returns (uint8)
        function latestRoundData() external view returns (uint80 roundId, int256 answer, uint256 startedAt, uint256 updatedAt, uint80 answeredInRound)
    ]"#
);

pub struct MockV3AggregatorDeployment {
    contract_address: Address,
}

impl MockV3AggregatorDeployment {
    pub fn from_session(session: &DeploymentSession) -> Result<Self> {
        Ok(Self {
            contract_address: session.get(MOCK_V3_AGGREGATOR)?.address,
        })
    }

    pub fn address(&self) -> Address {
        self.contract_address
    }

    pub fn contract_with_client<T: Middleware>(&self, client: Arc<T>) -> MockV3Aggregator<T> {
        MockV3Aggregator::new(self.contract_address, client)
    }

    pub async fn decimals(&self, client: Arc<impl Middleware>) -> Result<u8> {
        self.contract_with_client(client)
            .decimals()
            .call()
            .await
            .map_err(HarnessError::contract)
    }

    pub async fn latest_answer(&self, client: Arc<impl Middleware>) -> Result<I256> {
        let (_, answer, _, _, _) = self
            .contract_with_client(client)
            .latest_round_data()
            .call()
            .await
            .map_err(HarnessError::contract)?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::I256;

    use super::MockV3AggregatorDeployment;
    use crate::{
        config::{DECIMALS, INITIAL_ANSWER},
        contracts::test_utils::fixture,
    };

    #[tokio::test]
    #[ignore = "requires a local node on 127.0.0.1:8545 and compiled artifacts"]
    async fn test_mock_is_deployed_with_fixed_price() {
        let ctx = fixture().await;
        let mock = MockV3AggregatorDeployment::from_session(&ctx.session).unwrap();

        let decimals = mock.decimals(ctx.client.provider()).await.unwrap();
        let answer = mock.latest_answer(ctx.client.provider()).await.unwrap();

        assert_eq!(decimals, DECIMALS);
        assert_eq!(answer, I256::from(INITIAL_ANSWER));
    }
}
