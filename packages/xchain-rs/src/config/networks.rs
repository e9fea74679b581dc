//! Built-in network tables
//!
//! XRPL endpoints use the rippled JSON-RPC port (51234).

use super::{BridgeConfig, EvmChainConfig, PollingConfig, ReceiptConfig, XrplChainConfig};
use crate::types::Network;

/// Drops sent in the `gas_fee_amount` memo for XRP transfers
pub const DEFAULT_GAS_FEE_AMOUNT: &str = "1700000";

/// Fresh default configuration for `network`
pub fn defaults(network: Network) -> BridgeConfig {
    let (xrpl, evm) = match network {
        Network::Devnet => (
            xrpl_config(
                "https://s.devnet.rippletest.net:51234",
                "xrpl-dev",
                "rGAbJZEzU6WaYv5y1LfyN7LBBcQJ3TxsKC",
            ),
            evm_config(
                "https://rpc.devnet.xrplevm.org",
                "xrpl-evm-devnet",
                "0xF128c84c3326727c3e155168daAa4C0156B87AD1",
                "0x1a7580C2ef5D485E069B7cf1DF9f6478603024d3",
            ),
        ),
        Network::Testnet => (
            xrpl_config(
                "https://s.altnet.rippletest.net:51234",
                "xrpl",
                "rNrjh1KGZk2jBR3wPfAQnoidtFFYQKbQn2",
            ),
            evm_config(
                "https://rpc.testnet.xrplevm.org",
                "xrpl-evm",
                "0xe432150cce91c13a887f7D836923d5597adD8E31",
                "0xB5FB4BE02232B1bBA4dC8f81dc24C26980dE9e3C",
            ),
        ),
        // TODO: fill the mainnet gateway and token service addresses once the
        // Axelar XRPL mainnet deployment is published; until then callers must
        // supply them as overrides.
        Network::Mainnet => (
            xrpl_config("https://s1.ripple.com:51234", "xrpl", ""),
            evm_config("https://rpc.mainnet.xrplevm.org", "xrpl-evm", "", ""),
        ),
    };

    BridgeConfig { network, xrpl, evm }
}

/// The gateway account doubles as the token service on XRPL
fn xrpl_config(provider_url: &str, chain_id: &str, gateway: &str) -> XrplChainConfig {
    XrplChainConfig {
        provider_url: provider_url.to_string(),
        chain_id: chain_id.to_string(),
        gateway_address: gateway.to_string(),
        interchain_token_service_address: gateway.to_string(),
        gas_fee_amount: DEFAULT_GAS_FEE_AMOUNT.to_string(),
        seed: None,
        confirmation: PollingConfig::default(),
    }
}

fn evm_config(provider_url: &str, chain_id: &str, gateway: &str, its: &str) -> EvmChainConfig {
    EvmChainConfig {
        provider_url: provider_url.to_string(),
        chain_id: chain_id.to_string(),
        gateway_address: gateway.to_string(),
        interchain_token_service_address: its.to_string(),
        interchain_gas_value: "0".to_string(),
        gas_value: "0".to_string(),
        private_key: None,
        receipt: ReceiptConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testnet_defaults() {
        let config = defaults(Network::Testnet);
        assert_eq!(config.xrpl.chain_id, "xrpl");
        assert_eq!(config.evm.chain_id, "xrpl-evm");
        assert_eq!(
            config.evm.interchain_token_service_address,
            "0xB5FB4BE02232B1bBA4dC8f81dc24C26980dE9e3C"
        );
        assert_eq!(config.xrpl.gas_fee_amount, DEFAULT_GAS_FEE_AMOUNT);
        assert!(config.xrpl.seed.is_none());
        assert!(config.evm.private_key.is_none());
    }

    #[test]
    fn test_every_network_has_endpoints() {
        for network in [Network::Devnet, Network::Testnet, Network::Mainnet] {
            let config = defaults(network);
            assert!(config.xrpl.provider_url.starts_with("https://"), "{}", network);
            assert!(config.evm.provider_url.starts_with("https://"), "{}", network);
            assert_eq!(config.network, network);
        }
    }

    #[test]
    fn test_devnet_gateway_is_token_service() {
        let config = defaults(Network::Devnet);
        assert_eq!(
            config.xrpl.gateway_address,
            config.xrpl.interchain_token_service_address
        );
        assert_eq!(config.xrpl.chain_id, "xrpl-dev");
    }
}
