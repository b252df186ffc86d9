mod contract;

pub use contract::MarketClient;

use crate::market::MarketRecord;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no signing key configured")]
    NoKey,

    #[error("invalid private key: {0}")]
    BadKey(String),

    #[error("invalid rpc url: {0}")]
    BadRpcUrl(String),

    #[error("contract call failed: {0}")]
    Call(#[from] alloy::contract::Error),

    #[error("transaction failed: {0}")]
    Tx(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("contract returned out-of-range {field}")]
    OutOfRange { field: &'static str },
}

/// Read surface of the contract. The reader takes this instead of the
/// concrete client so its batch logic can be exercised against an
/// in-memory source.
pub trait MarketSource {
    /// Total number of markets registered on the contract.
    fn market_count(&self) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// Fetch one market by index. The returned record carries `id`.
    fn market(&self, id: u64) -> impl Future<Output = Result<MarketRecord, ChainError>> + Send;
}
