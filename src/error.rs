use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectorError {
    /// The chain data source could not produce the requested block.
    #[error("block {block} unavailable: {reason}")]
    DataUnavailable { block: u64, reason: String },

    #[error("block 0 has no previous block to compare against")]
    NoPreviousBlock,
}

impl DetectorError {
    pub fn unavailable(block: u64, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            block,
            reason: reason.to_string(),
        }
    }
}
