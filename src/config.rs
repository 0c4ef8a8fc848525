use alloy::primitives::{Address, U256};
use config::{Config, File};
use serde::Deserialize;
use thiserror::Error;

use crate::detectors::Deployer;

pub const DEFAULT_THRESHOLD: &str = "6559585103933";
pub const DEFAULT_TOKEN_CONTRACT: &str = "0x61447385B019187daa48e91c55c02AF1F1f3F863";
pub const DEFAULT_DEPLOYER_ADDRESS: &str = "0x88dC3a2284FA62e0027d6D6B1fCfDd2141a143b8";
pub const DEFAULT_DEPLOYER_NAME: &str = "NETHERMIND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid difficulty threshold {0:?}: expected a decimal integer")]
    InvalidThreshold(String),
}

#[derive(Debug, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyRuleConfig {
    pub enabled: bool,
    /// Decimal string; difficulty does not fit in a TOML integer.
    pub threshold: String,
}

impl DifficultyRuleConfig {
    pub fn threshold(&self) -> Result<U256, ConfigError> {
        let threshold = self.threshold.trim();
        if threshold.is_empty() {
            return Err(ConfigError::InvalidThreshold(self.threshold.clone()));
        }
        U256::from_str_radix(threshold, 10)
            .map_err(|_| ConfigError::InvalidThreshold(self.threshold.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentMintRuleConfig {
    pub enabled: bool,
    pub token_contract: Address,
    pub deployer_address: Address,
    pub deployer_name: String,
}

impl AgentMintRuleConfig {
    pub fn deployer(&self) -> Deployer {
        Deployer {
            address: self.deployer_address,
            name: self.deployer_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub difficulty: DifficultyRuleConfig,
    pub agent_mint: AgentMintRuleConfig,
}

impl AppConfig {
    /// Defaults, then `config.*` in the working directory if present.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(Self::builder()?.add_source(File::with_name("config").required(false)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::from_builder(
            Self::builder()?.add_source(File::from_str(contents, config::FileFormat::Toml)),
        )
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("chain.rpc_url", "ws://localhost:8546")?
            .set_default("difficulty.enabled", true)?
            .set_default("difficulty.threshold", DEFAULT_THRESHOLD)?
            .set_default("agent_mint.enabled", true)?
            .set_default("agent_mint.token_contract", DEFAULT_TOKEN_CONTRACT)?
            .set_default("agent_mint.deployer_address", DEFAULT_DEPLOYER_ADDRESS)?
            .set_default("agent_mint.deployer_name", DEFAULT_DEPLOYER_NAME)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.difficulty.threshold()?;
        Ok(cfg)
    }
}
