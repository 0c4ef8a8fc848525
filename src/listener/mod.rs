use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder, RootProvider, WsConnect};
use alloy::pubsub::PubSubFrontend;
use alloy::rpc::types::{Block, Filter};
use eyre::Result;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::alerts::Finding;
use crate::detectors::DetectorEngine;
use crate::events::{group_by_transaction, BlockEvent, TransactionEvent};

pub type WsProvider = RootProvider<PubSubFrontend>;

pub async fn connect(rpc_url: &str) -> Result<WsProvider> {
    let url = Url::parse(rpc_url)?;
    let ws = WsConnect::new(url);
    let provider = ProviderBuilder::new().on_ws(ws).await?;
    Ok(provider)
}

/// Where transaction events come from: logs of `contract` in each new block.
#[derive(Debug, Clone, Copy)]
pub struct LogSource {
    pub contract: Address,
}

/// Feeds every new head, and the transactions in it, through the engine.
///
/// A block whose detectors fail is logged and skipped; the subscription
/// keeps going.
pub async fn watch_blocks(
    provider: Arc<WsProvider>,
    engine: Arc<DetectorEngine>,
    logs: Option<LogSource>,
    tx: Sender<Finding>,
) -> Result<()> {
    let chain_id = provider.get_chain_id().await?;
    info!("Watching blocks on chain {}", chain_id);

    let sub = provider.subscribe_blocks().await?;
    let mut stream = sub.into_stream();

    while let Some(block) = stream.next().await {
        let Some(event) = block_event(chain_id, &block) else {
            warn!("Skipping pending block without a number");
            continue;
        };
        info!("New Block: {}", event.number);

        let mut findings = match engine.handle_block(&event).await {
            Ok(findings) => findings,
            Err(e) => {
                warn!("Block {} not evaluated: {}", event.number, e);
                Vec::new()
            }
        };

        if let Some(source) = logs {
            match block_transactions(&provider, chain_id, event.number, source.contract).await {
                Ok(txs) => {
                    for transaction in &txs {
                        findings.extend(engine.handle_transaction(transaction));
                    }
                }
                Err(e) => warn!("Logs for block {} unavailable: {}", event.number, e),
            }
        }

        for finding in findings {
            if let Err(e) = tx.send(finding).await {
                error!("Failed to send finding: {}", e);
                return Ok(());
            }
        }
    }

    Ok(())
}

fn block_event(chain_id: u64, block: &Block) -> Option<BlockEvent> {
    Some(BlockEvent {
        number: block.header.number?,
        network: chain_id,
        difficulty: block.header.difficulty,
    })
}

async fn block_transactions(
    provider: &WsProvider,
    chain_id: u64,
    number: u64,
    contract: Address,
) -> Result<Vec<TransactionEvent>> {
    let filter = Filter::new().address(contract).from_block(number).to_block(number);

    let logs = provider.get_logs(&filter).await?;
    debug!("Block {}: {} log(s) from {}", number, logs.len(), contract);

    Ok(group_by_transaction(
        chain_id,
        logs.into_iter().map(|log| (log.transaction_hash, log.inner)),
    ))
}
