use dotenv::dotenv;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use chain_alert_detectors::config::AppConfig;
use chain_alert_detectors::detectors::{AgentMintDetector, DetectorEngine, DifficultyDetector};
use chain_alert_detectors::listener::{connect, watch_blocks, LogSource};
use chain_alert_detectors::{AlertEmitter, RpcChainDataSource};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // stdout carries the alert stream, so logs go to a file
    let file_appender = tracing_appender::rolling::daily("logs", "detector.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    info!("Starting chain alert detectors");

    // 1. Load Config
    let mut config = AppConfig::new()?;

    if let Ok(env_rpc) = std::env::var("RPC_URL") {
        config.chain.rpc_url = env_rpc;
    }

    info!("Configuration Loaded:");
    info!("  RPC URL: [HIDDEN]");
    info!(
        "  Difficulty: {} (threshold {})",
        if config.difficulty.enabled { "Enabled" } else { "Disabled" },
        config.difficulty.threshold
    );
    info!(
        "  Agent mints: {} ({} -> {})",
        if config.agent_mint.enabled { "Enabled" } else { "Disabled" },
        config.agent_mint.token_contract,
        config.agent_mint.deployer_name
    );

    // 2. Setup Components
    let provider = Arc::new(connect(&config.chain.rpc_url).await?);
    let emitter = Arc::new(AlertEmitter::stdout());

    let mut engine = DetectorEngine::new();

    if config.difficulty.enabled {
        let source = Arc::new(RpcChainDataSource::new(provider.clone()));
        engine.add_block_detector(Box::new(DifficultyDetector::new(
            config.difficulty.threshold()?,
            source,
        )));
    }

    let mut log_source = None;
    if config.agent_mint.enabled {
        engine.add_transaction_detector(Box::new(AgentMintDetector::new(
            config.agent_mint.token_contract,
            config.agent_mint.deployer(),
        )));
        log_source = Some(LogSource {
            contract: config.agent_mint.token_contract,
        });
    }

    if engine.is_empty() {
        warn!("No detectors enabled; nothing to do");
        return Ok(());
    }
    let engine = Arc::new(engine);

    // 3. Spawn Tasks with Backpressure
    let (tx, rx) = mpsc::channel(100);

    let producer = tokio::spawn(async move {
        if let Err(e) = watch_blocks(provider, engine, log_source, tx).await {
            error!("Block listener failed: {}", e);
        }
    });

    let consumer = tokio::spawn(async move { emitter.drain(rx).await });

    info!("Detectors active. Waiting for blocks...");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            consumer.abort();
        }
        _ = producer => {
            // the sender is gone; let the consumer finish what is buffered
            warn!("Block listener stopped");
            if let Err(e) = consumer.await {
                error!("Alert consumer failed: {}", e);
            }
        }
    }

    Ok(())
}
