use alloy::primitives::U256;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ChainBlock, ChainDataSource};
use crate::error::DetectorError;

/// Deterministic in-memory chain. Unknown block numbers are unavailable.
#[derive(Debug, Default)]
pub struct MemoryChainData {
    difficulties: HashMap<u64, U256>,
    reads: AtomicUsize,
}

impl MemoryChainData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, number: u64, difficulty: U256) -> Self {
        self.difficulties.insert(number, difficulty);
        self
    }

    /// Number of `get_block` calls served so far, including failed ones.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ChainDataSource for MemoryChainData {
    async fn get_block(&self, number: u64) -> Result<ChainBlock, DetectorError> {
        self.reads.fetch_add(1, Ordering::Relaxed);

        self.difficulties
            .get(&number)
            .map(|difficulty| ChainBlock {
                number,
                difficulty: *difficulty,
            })
            .ok_or_else(|| DetectorError::unavailable(number, "no such block"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_known_blocks_and_counts_reads() {
        let chain = MemoryChainData::new().with_block(29, U256::from(230u64));

        let block = chain.get_block(29).await.unwrap();
        assert_eq!(block.difficulty, U256::from(230u64));

        let err = chain.get_block(28).await.unwrap_err();
        assert!(matches!(err, DetectorError::DataUnavailable { block: 28, .. }));

        assert_eq!(chain.reads(), 2);
    }
}
