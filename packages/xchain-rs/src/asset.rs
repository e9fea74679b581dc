//! Transferable assets
//!
//! An [`Asset`] is exactly one of:
//!
//! - [`XrpAsset`] - native XRP, 6 fractional digits
//! - [`IssuedAsset`] - an XRPL token identified by issuer + currency code
//! - [`EvmAsset`] - an interchain token contract on XRPL EVM
//!
//! When deserialized, a value carrying fields of two variants is rejected.
//! EVM assets may omit `decimals` and `token_id`; [`resolve_evm_asset`] fills
//! them from the token contract and memoizes the answers per address.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::BridgeError;
use crate::evm::EvmChainClient;

// ============================================================================
// Asset Variants
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XrpAsset {
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuedAsset {
    pub issuer: String,
    pub currency: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvmAsset {
    /// Token contract address
    pub address: Address,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Interchain token id registered with the token service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<B256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    Evm(EvmAsset),
    Issued(IssuedAsset),
    Xrp(XrpAsset),
}

impl Asset {
    pub fn xrp(amount: impl Into<String>) -> Self {
        Asset::Xrp(XrpAsset {
            amount: amount.into(),
        })
    }

    pub fn issued(
        issuer: impl Into<String>,
        currency: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Asset::Issued(IssuedAsset {
            issuer: issuer.into(),
            currency: currency.into(),
            amount: amount.into(),
        })
    }

    pub fn evm(address: Address, amount: impl Into<String>) -> Self {
        Asset::Evm(EvmAsset {
            address,
            amount: amount.into(),
            decimals: None,
            token_id: None,
        })
    }

    pub fn amount(&self) -> &str {
        match self {
            Asset::Xrp(a) => &a.amount,
            Asset::Issued(a) => &a.amount,
            Asset::Evm(a) => &a.amount,
        }
    }

    /// Short label used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Asset::Xrp(_) => "xrp",
            Asset::Issued(_) => "issued",
            Asset::Evm(_) => "evm",
        }
    }
}

/// Whether the asset lives on the contract chain. Drives transfer direction.
pub fn is_contract_asset(asset: &Asset) -> bool {
    matches!(asset, Asset::Evm(_))
}

// ============================================================================
// Token Info Cache
// ============================================================================

/// Token metadata learned from chain, per contract address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachedAssetInfo {
    pub decimals: Option<u8>,
    pub token_id: Option<B256>,
}

/// Per-bridge memo of token decimals and interchain token ids.
///
/// Values never change for a deployed token, so a racing duplicate fill
/// writes the same answer.
#[derive(Debug, Clone, Default)]
pub struct AssetInfoCache {
    entries: Arc<RwLock<HashMap<Address, CachedAssetInfo>>>,
}

impl AssetInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, address: &Address) -> CachedAssetInfo {
        self.entries
            .read()
            .await
            .get(address)
            .copied()
            .unwrap_or_default()
    }

    pub async fn record_decimals(&self, address: Address, decimals: u8) {
        self.entries
            .write()
            .await
            .entry(address)
            .or_default()
            .decimals = Some(decimals);
    }

    pub async fn record_token_id(&self, address: Address, token_id: B256) {
        self.entries
            .write()
            .await
            .entry(address)
            .or_default()
            .token_id = Some(token_id);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// An EVM asset with every field required to build a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvmAsset {
    pub address: Address,
    pub amount: String,
    pub decimals: u8,
    pub token_id: B256,
}

/// Fill in missing `decimals` / `token_id`.
///
/// Caller-supplied values win, then cached values, then a contract read whose
/// answer is cached. The input asset is left untouched.
pub async fn resolve_evm_asset(
    asset: &EvmAsset,
    client: &dyn EvmChainClient,
    cache: &AssetInfoCache,
) -> Result<ResolvedEvmAsset, BridgeError> {
    let cached = cache.get(&asset.address).await;

    let decimals = match asset.decimals.or(cached.decimals) {
        Some(decimals) => decimals,
        None => {
            let decimals = client.decimals(asset.address).await.map_err(|cause| {
                BridgeError::AssetInfoUnavailable {
                    address: asset.address.to_string(),
                    field: "decimals",
                    cause,
                }
            })?;
            debug!(token = %asset.address, decimals = decimals, "Resolved token decimals");
            cache.record_decimals(asset.address, decimals).await;
            decimals
        }
    };

    let token_id = match asset.token_id.or(cached.token_id) {
        Some(token_id) => token_id,
        None => {
            let token_id = client
                .interchain_token_id(asset.address)
                .await
                .map_err(|cause| BridgeError::AssetInfoUnavailable {
                    address: asset.address.to_string(),
                    field: "interchainTokenId",
                    cause,
                })?;
            debug!(token = %asset.address, token_id = %token_id, "Resolved interchain token id");
            cache.record_token_id(asset.address, token_id).await;
            token_id
        }
    };

    Ok(ResolvedEvmAsset {
        address: asset.address,
        amount: asset.amount.clone(),
        decimals,
        token_id,
    })
}
