use alloy::primitives::{Log, B256, U256};
use serde::{Deserialize, Serialize};
use alloy::sol;

mod network;

pub use network::Network;

sol! {
    /// ERC-721 transfer. All three fields are indexed, so a conforming log
    /// carries four topics and empty data.
    #[derive(Debug, PartialEq, Eq)]
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub number: u64,
    /// Chain id of the network the block was observed on.
    pub network: u64,
    pub difficulty: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub network: u64,
    pub hash: Option<B256>,
    pub logs: Vec<Log>,
}

impl TransactionEvent {
    pub fn new(network: u64, logs: Vec<Log>) -> Self {
        Self { network, hash: None, logs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainEvent {
    Block(BlockEvent),
    Transaction(TransactionEvent),
}

impl From<BlockEvent> for ChainEvent {
    fn from(block: BlockEvent) -> Self {
        Self::Block(block)
    }
}

impl From<TransactionEvent> for ChainEvent {
    fn from(tx: TransactionEvent) -> Self {
        Self::Transaction(tx)
    }
}

/// Splits a block's logs into one `TransactionEvent` per transaction.
///
/// Logs must arrive in chain order; consecutive logs sharing a transaction
/// hash are grouped and their relative order is kept.
pub fn group_by_transaction<I>(network: u64, logs: I) -> Vec<TransactionEvent>
where
    I: IntoIterator<Item = (Option<B256>, Log)>,
{
    let mut txs: Vec<TransactionEvent> = Vec::new();

    for (hash, log) in logs {
        match txs.last_mut() {
            Some(current) if hash.is_some() && current.hash == hash => current.logs.push(log),
            _ => txs.push(TransactionEvent {
                network,
                hash,
                logs: vec![log],
            }),
        }
    }

    txs
}
