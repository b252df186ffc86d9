use alloy::providers::DynProvider;
use alloy::sol;
use alloy_primitives::{Address, U256};

use super::{ChainError, MarketSource};
use crate::market::MarketRecord;

sol! {
    #[sol(rpc)]
    contract PredictionMarket {
        function marketCount() external view returns (uint256);
        function markets(uint256 id)
            external
            view
            returns (string question, uint256 endTime, bool resolved, uint256 yesShares, uint256 noShares);
        function createMarket(string question, uint256 duration) external;
    }
}

/// Handle on the deployed contract. Cheap to clone; clones share the
/// underlying provider.
#[derive(Clone)]
pub struct MarketClient {
    contract: PredictionMarket::PredictionMarketInstance<DynProvider>,
}

impl MarketClient {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: PredictionMarket::new(address, provider),
        }
    }

    pub async fn market_count(&self) -> Result<u64, ChainError> {
        let count = self.contract.marketCount().call().await?;
        to_u64(count, "marketCount")
    }

    pub async fn market(&self, id: u64) -> Result<MarketRecord, ChainError> {
        let ret = self.contract.markets(U256::from(id)).call().await?;
        Ok(MarketRecord {
            id,
            question: ret.question,
            end_time: to_u64(ret.endTime, "endTime")?,
            resolved: ret.resolved,
            yes_shares: to_u64(ret.yesShares, "yesShares")?,
            no_shares: to_u64(ret.noShares, "noShares")?,
        })
    }

    /// Submit createMarket and wait for the receipt. A mined-but-reverted
    /// transaction is an error, not a success.
    pub async fn create_market(
        &self,
        question: &str,
        duration_secs: u64,
    ) -> Result<String, ChainError> {
        let pending = self
            .contract
            .createMarket(question.to_string(), U256::from(duration_secs))
            .send()
            .await?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ChainError::Tx(e.to_string()))?;
        let hash = format!("{:#x}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(ChainError::Reverted(hash));
        }
        Ok(hash)
    }
}

impl MarketSource for MarketClient {
    async fn market_count(&self) -> Result<u64, ChainError> {
        MarketClient::market_count(self).await
    }

    async fn market(&self, id: u64) -> Result<MarketRecord, ChainError> {
        MarketClient::market(self, id).await
    }
}

fn to_u64(value: U256, field: &'static str) -> Result<u64, ChainError> {
    value
        .try_into()
        .map_err(|_| ChainError::OutOfRange { field })
}
