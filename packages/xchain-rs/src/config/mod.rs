//! Bridge configuration
//!
//! [`resolve`] takes the built-in table for a [`Network`], applies caller
//! [`BridgeOverrides`] field by field, and checks that at least one signing
//! credential is present. Overrides deserialize from JSON/TOML; absent fields
//! keep their defaults at every depth.

pub mod networks;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BridgeError;
use crate::redact::Secret;
use crate::types::{Chain, Network};

// ============================================================================
// Resolved Configuration
// ============================================================================

/// Poll-for-validation settings for XRPL transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    30
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Receipt wait settings for XRPL EVM transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptConfig {
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_receipt_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_receipt_poll_interval_ms() -> u64 {
    1_000
}

fn default_receipt_timeout_ms() -> u64 {
    120_000
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_receipt_poll_interval_ms(),
            timeout_ms: default_receipt_timeout_ms(),
        }
    }
}

impl ReceiptConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XrplChainConfig {
    pub provider_url: String,
    /// Axelar chain name of XRPL
    pub chain_id: String,
    /// Account transfers are paid to
    pub gateway_address: String,
    pub interchain_token_service_address: String,
    /// Drops declared in the `gas_fee_amount` memo
    pub gas_fee_amount: String,
    pub seed: Option<Secret>,
    pub confirmation: PollingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvmChainConfig {
    pub provider_url: String,
    /// Axelar chain name of XRPL EVM
    pub chain_id: String,
    pub gateway_address: String,
    pub interchain_token_service_address: String,
    /// `gasValue` argument of `interchainTransfer`, in wei
    pub interchain_gas_value: String,
    /// Native value attached to the transfer transaction, in wei
    pub gas_value: String,
    pub private_key: Option<Secret>,
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeConfig {
    pub network: Network,
    pub xrpl: XrplChainConfig,
    pub evm: EvmChainConfig,
}

impl BridgeConfig {
    pub fn has_xrpl_signer(&self) -> bool {
        self.xrpl.seed.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_evm_signer(&self) -> bool {
        self.evm.private_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

// ============================================================================
// Overrides
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollingOverrides {
    pub interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReceiptOverrides {
    pub poll_interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XrplOverrides {
    pub provider_url: Option<String>,
    pub chain_id: Option<String>,
    pub gateway_address: Option<String>,
    pub interchain_token_service_address: Option<String>,
    pub gas_fee_amount: Option<String>,
    pub seed: Option<Secret>,
    pub confirmation: PollingOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvmOverrides {
    pub provider_url: Option<String>,
    pub chain_id: Option<String>,
    pub gateway_address: Option<String>,
    pub interchain_token_service_address: Option<String>,
    pub interchain_gas_value: Option<String>,
    pub gas_value: Option<String>,
    pub private_key: Option<Secret>,
    pub receipt: ReceiptOverrides,
}

/// Partial configuration supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeOverrides {
    pub xrpl: XrplOverrides,
    #[serde(rename = "xrplevm", alias = "evm")]
    pub evm: EvmOverrides,
}

impl BridgeOverrides {
    pub fn with_xrpl_seed(mut self, seed: impl Into<Secret>) -> Self {
        self.xrpl.seed = Some(seed.into());
        self
    }

    pub fn with_evm_private_key(mut self, key: impl Into<Secret>) -> Self {
        self.evm.private_key = Some(key.into());
        self
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl PollingConfig {
    fn merge(&mut self, overrides: PollingOverrides) {
        apply(&mut self.interval_ms, overrides.interval_ms);
        apply(&mut self.max_attempts, overrides.max_attempts);
    }
}

impl ReceiptConfig {
    fn merge(&mut self, overrides: ReceiptOverrides) {
        apply(&mut self.poll_interval_ms, overrides.poll_interval_ms);
        apply(&mut self.timeout_ms, overrides.timeout_ms);
    }
}

impl XrplChainConfig {
    fn merge(&mut self, overrides: XrplOverrides) {
        apply(&mut self.provider_url, overrides.provider_url);
        apply(&mut self.chain_id, overrides.chain_id);
        apply(&mut self.gateway_address, overrides.gateway_address);
        apply(
            &mut self.interchain_token_service_address,
            overrides.interchain_token_service_address,
        );
        apply(&mut self.gas_fee_amount, overrides.gas_fee_amount);
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self.confirmation.merge(overrides.confirmation);
    }
}

impl EvmChainConfig {
    fn merge(&mut self, overrides: EvmOverrides) {
        apply(&mut self.provider_url, overrides.provider_url);
        apply(&mut self.chain_id, overrides.chain_id);
        apply(&mut self.gateway_address, overrides.gateway_address);
        apply(
            &mut self.interchain_token_service_address,
            overrides.interchain_token_service_address,
        );
        apply(&mut self.interchain_gas_value, overrides.interchain_gas_value);
        apply(&mut self.gas_value, overrides.gas_value);
        if overrides.private_key.is_some() {
            self.private_key = overrides.private_key;
        }
        self.receipt.merge(overrides.receipt);
    }
}

/// Merge `overrides` onto the defaults for `network`.
///
/// Fails with [`BridgeError::MissingCredential`] when neither an XRPL seed
/// nor an XRPL EVM private key ends up configured.
pub fn resolve(network: Network, overrides: BridgeOverrides) -> Result<BridgeConfig, BridgeError> {
    let mut config = networks::defaults(network);
    config.xrpl.merge(overrides.xrpl);
    config.evm.merge(overrides.evm);

    if !config.has_xrpl_signer() && !config.has_evm_signer() {
        // reported against the chain most transfers originate from
        return Err(BridgeError::MissingCredential { chain: Chain::Xrpl });
    }

    debug!(
        network = %network,
        xrpl_rpc = %config.xrpl.provider_url,
        evm_rpc = %config.evm.provider_url,
        xrpl_signer = config.has_xrpl_signer(),
        evm_signer = config.has_evm_signer(),
        "Resolved bridge configuration"
    );

    Ok(config)
}
