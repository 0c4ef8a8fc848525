use async_trait::async_trait;
use std::fmt::Debug;
use tracing::debug;

use crate::alerts::Finding;
use crate::error::DetectorError;
use crate::events::{BlockEvent, ChainEvent, TransactionEvent};

mod agent_mint;
mod difficulty;

pub use agent_mint::{AgentMintConfig, AgentMintDetector, Deployer};
pub use difficulty::{DifficultyConfig, DifficultyDetector};

/// Runs once per block. May read the chain, so it can fail.
#[async_trait]
pub trait BlockDetector: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    async fn check(&self, block: &BlockEvent) -> Result<Vec<Finding>, DetectorError>;
}

/// Runs once per transaction; a pure function of the transaction.
pub trait TransactionDetector: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn check(&self, tx: &TransactionEvent) -> Vec<Finding>;
}

#[derive(Debug, Default)]
pub struct DetectorEngine {
    block_detectors: Vec<Box<dyn BlockDetector>>,
    transaction_detectors: Vec<Box<dyn TransactionDetector>>,
}

impl DetectorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block_detector(&mut self, detector: Box<dyn BlockDetector>) {
        self.block_detectors.push(detector);
    }

    pub fn add_transaction_detector(&mut self, detector: Box<dyn TransactionDetector>) {
        self.transaction_detectors.push(detector);
    }

    pub fn is_empty(&self) -> bool {
        self.block_detectors.is_empty() && self.transaction_detectors.is_empty()
    }

    /// Findings of all block detectors in registration order. The first
    /// failing detector aborts the block.
    pub async fn handle_block(&self, block: &BlockEvent) -> Result<Vec<Finding>, DetectorError> {
        let mut findings = Vec::new();
        for detector in &self.block_detectors {
            let found = detector.check(block).await?;
            debug!("{} produced {} finding(s) for block {}", detector.name(), found.len(), block.number);
            findings.extend(found);
        }
        Ok(findings)
    }

    pub fn handle_transaction(&self, tx: &TransactionEvent) -> Vec<Finding> {
        let mut findings = Vec::new();
        for detector in &self.transaction_detectors {
            findings.extend(detector.check(tx));
        }
        findings
    }

    pub async fn handle_event(&self, event: &ChainEvent) -> Result<Vec<Finding>, DetectorError> {
        match event {
            ChainEvent::Block(block) => self.handle_block(block).await,
            ChainEvent::Transaction(tx) => Ok(self.handle_transaction(tx)),
        }
    }
}
