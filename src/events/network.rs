use serde::{Deserialize, Serialize};
use std::fmt;

/// Networks the alert platform labels by name. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Optimism,
    Bsc,
    Polygon,
    Fantom,
    Arbitrum,
    Avalanche,
    Unknown,
}

impl Network {
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            1 => Network::Mainnet,
            3 => Network::Ropsten,
            4 => Network::Rinkeby,
            5 => Network::Goerli,
            10 => Network::Optimism,
            56 => Network::Bsc,
            137 => Network::Polygon,
            250 => Network::Fantom,
            42161 => Network::Arbitrum,
            43114 => Network::Avalanche,
            _ => Network::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "MAINNET",
            Network::Ropsten => "ROPSTEN",
            Network::Rinkeby => "RINKEBY",
            Network::Goerli => "GOERLI",
            Network::Optimism => "OPTIMISM",
            Network::Bsc => "BSC",
            Network::Polygon => "POLYGON",
            Network::Fantom => "FANTOM",
            Network::Arbitrum => "ARBITRUM",
            Network::Avalanche => "AVALANCHE",
            Network::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
