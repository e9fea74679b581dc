//! Common types for cross-chain operations
//!
//! Identifies the two chains the client bridges between and the network
//! environment whose static defaults are used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Chains
// ============================================================================

/// One side of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// The XRP Ledger (payments + memos, validated-ledger finality)
    Xrpl,
    /// The XRPL EVM sidechain (contract calls, receipt finality)
    #[serde(rename = "xrplevm")]
    XrplEvm,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Xrpl => f.write_str("XRPL"),
            Chain::XrplEvm => f.write_str("XRPL EVM"),
        }
    }
}

// ============================================================================
// Networks
// ============================================================================

/// Deployment environment selecting a default configuration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(eyre::eyre!("Unknown network: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_str() {
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(" devnet ".parse::<Network>().unwrap(), Network::Devnet);
        assert!("localnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_chain_serde_names() {
        let json = serde_json::to_string(&Chain::XrplEvm).unwrap();
        assert_eq!(json, "\"xrplevm\"");
        let chain: Chain = serde_json::from_str("\"xrpl\"").unwrap();
        assert_eq!(chain, Chain::Xrpl);
    }
}
