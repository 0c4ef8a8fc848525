use alloy::primitives::U256;
use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::DetectorError;

mod memory;
mod rpc;

pub use memory::MemoryChainData;
pub use rpc::RpcChainDataSource;

/// The subset of a block the detectors read back from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub number: u64,
    pub difficulty: U256,
}

/// Read access to historical blocks.
///
/// Implementations own any timeout or retry policy; callers see a single
/// `DataUnavailable` when a block cannot be produced.
#[async_trait]
pub trait ChainDataSource: Send + Sync + Debug {
    async fn get_block(&self, number: u64) -> Result<ChainBlock, DetectorError>;
}
