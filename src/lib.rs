//! Chain alert detectors.
//!
//! Two stateless detectors turn chain events into findings: a block
//! difficulty delta check that reads the previous block from a
//! [`source::ChainDataSource`], and an agent registry mint check that works on
//! a transaction's logs alone.

pub mod alerts;
pub mod config;
pub mod detectors;
pub mod error;
pub mod events;
pub mod listener;
pub mod source;

pub use alerts::{AlertEmitter, Finding, FindingSeverity, FindingType};
pub use detectors::{AgentMintDetector, Deployer, DetectorEngine, DifficultyDetector};
pub use error::DetectorError;
pub use events::{BlockEvent, ChainEvent, Network, TransactionEvent};
pub use source::{ChainBlock, ChainDataSource, MemoryChainData, RpcChainDataSource};
