use alloy::primitives::U256;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::BlockDetector;
use crate::alerts::{Finding, ALERT_ID};
use crate::error::DetectorError;
use crate::events::{BlockEvent, Network};
use crate::source::ChainDataSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyConfig {
    pub threshold: U256,
}

/// Flags a block whose difficulty moved by more than `threshold` since the
/// previous block.
#[derive(Debug, Clone)]
pub struct DifficultyDetector {
    config: DifficultyConfig,
    source: Arc<dyn ChainDataSource>,
}

impl DifficultyDetector {
    pub fn new(threshold: U256, source: Arc<dyn ChainDataSource>) -> Self {
        Self {
            config: DifficultyConfig { threshold },
            source,
        }
    }

    pub async fn evaluate(&self, block: &BlockEvent) -> Result<Vec<Finding>, DetectorError> {
        let previous_number = block.number.checked_sub(1).ok_or(DetectorError::NoPreviousBlock)?;
        let previous = self.source.get_block(previous_number).await?;

        let difference = block.difficulty.abs_diff(previous.difficulty);
        debug!(
            "Block {} difficulty {} vs {} (diff {})",
            block.number, block.difficulty, previous.difficulty, difference
        );

        if difference <= self.config.threshold {
            return Ok(Vec::new());
        }

        let finding = Finding::info(
            "Difficulty threshold surpassed",
            format!("Block difficulty threshold ({}) has been surpassed", self.config.threshold),
            ALERT_ID,
            Network::from_chain_id(block.network).name(),
        )
        .with_metadata("currentBlockNumber", block.number)
        .with_metadata("currentBlockDifficulty", block.difficulty)
        .with_metadata("previousBlockNumber", previous_number)
        .with_metadata("previousBlockDifficulty", previous.difficulty)
        .with_metadata("difficultyDifference", difference);

        Ok(vec![finding])
    }
}

#[async_trait]
impl BlockDetector for DifficultyDetector {
    fn name(&self) -> &'static str {
        "difficulty-delta"
    }

    async fn check(&self, block: &BlockEvent) -> Result<Vec<Finding>, DetectorError> {
        self.evaluate(block).await
    }
}
