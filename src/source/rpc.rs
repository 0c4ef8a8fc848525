use alloy::providers::Provider;
use alloy::rpc::types::BlockNumberOrTag;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{ChainBlock, ChainDataSource};
use crate::error::DetectorError;
use crate::listener::WsProvider;

/// `ChainDataSource` over a live websocket RPC connection.
#[derive(Clone)]
pub struct RpcChainDataSource {
    provider: Arc<WsProvider>,
}

impl RpcChainDataSource {
    pub fn new(provider: Arc<WsProvider>) -> Self {
        Self { provider }
    }
}

impl fmt::Debug for RpcChainDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcChainDataSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainDataSource for RpcChainDataSource {
    async fn get_block(&self, number: u64) -> Result<ChainBlock, DetectorError> {
        debug!("Fetching block {}", number);

        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number), false)
            .await
            .map_err(|e| DetectorError::unavailable(number, e))?
            .ok_or_else(|| DetectorError::unavailable(number, "block not found"))?;

        Ok(ChainBlock {
            number,
            difficulty: block.header.difficulty,
        })
    }
}
