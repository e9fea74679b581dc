//! Per-direction transfer options
//!
//! Every field is optional; an omitted value falls back to the resolved
//! [`BridgeConfig`](crate::config::BridgeConfig).

use alloy::primitives::U256;

/// Options for transfers that start on XRPL EVM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvmTransferOptions {
    /// `gasValue` argument of `interchainTransfer` (wei)
    pub interchain_gas_value: Option<U256>,
    /// Native value attached to the transaction (wei)
    pub gas_value: Option<U256>,
    pub gas_limit: Option<u64>,
}

/// Options for transfers that start on XRPL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XrplTransferOptions {
    /// Drops declared in the `gas_fee_amount` memo. Ignored for issued
    /// assets, which always declare `0`.
    pub gas_fee_amount: Option<String>,
    /// Hex (optionally `0x`-prefixed) or plain text carried in a `payload` memo
    pub payload: Option<String>,
}

/// Options for [`Bridge::transfer`](super::Bridge::transfer); only the half
/// matching the asset's direction is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOptions {
    pub evm: EvmTransferOptions,
    pub xrpl: XrplTransferOptions,
}

impl From<EvmTransferOptions> for TransferOptions {
    fn from(evm: EvmTransferOptions) -> Self {
        Self {
            evm,
            ..Default::default()
        }
    }
}

impl From<XrplTransferOptions> for TransferOptions {
    fn from(xrpl: XrplTransferOptions) -> Self {
        Self {
            xrpl,
            ..Default::default()
        }
    }
}
