//! xchain-rs: Cross-Chain Transfers between XRPL and XRPL EVM
//!
//! This crate moves value between the XRP Ledger and the XRPL EVM sidechain
//! through the Axelar interchain token service:
//!
//! - **Bridge** - Direction dispatch, memo construction, submission
//! - **Config** - Per-network defaults merged with caller overrides
//! - **Assets** - XRP, issued tokens and EVM tokens, with token info memoization
//! - **Transaction Handles** - Submit now, `wait()` for finality later
//! - **XRPL Module** - JSON-RPC client, binary codec, family-seed wallet
//! - **EVM Module** - Alloy client and interchain token service bindings
//! - **Translators** - Address and currency code conversions between chains
//!
//! ## Usage
//!
//! ```no_run
//! use xchain_rs::{Asset, Bridge, BridgeOverrides, Network, TransferOptions};
//!
//! # async fn run() -> Result<(), xchain_rs::BridgeError> {
//! let overrides = BridgeOverrides::default().with_xrpl_seed("s...");
//! let bridge = Bridge::from_config(Network::Testnet, overrides)?;
//!
//! let handle = bridge
//!     .transfer(
//!         &Asset::xrp("10"),
//!         "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
//!         TransferOptions::default(),
//!     )
//!     .await?;
//! let confirmed = handle.wait().await?;
//! println!("validated {}", confirmed.hash);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod address_codec;
pub mod amount;
pub mod asset;
pub mod currency;
pub mod error;
pub mod redact;
pub mod types;

// Chain adapters
pub mod evm;
pub mod xrpl;

// Orchestration
pub mod bridge;
pub mod config;
pub mod transaction;

// Re-export commonly used items at the crate root
pub use address_codec::{
    contract_address_from_ledger_address, ledger_account_from_contract_address,
    ledger_hex_from_contract_address,
};
pub use amount::{scale_amount, xrp_to_drops};
pub use asset::{is_contract_asset, Asset, AssetInfoCache, EvmAsset, IssuedAsset, XrpAsset};
pub use bridge::{Bridge, EvmTransferOptions, TransferOptions, XrplTransferOptions};
pub use config::{resolve, BridgeConfig, BridgeOverrides};
pub use currency::{normalize_currency_code, parse_currency_code};
pub use error::BridgeError;
pub use redact::Secret;
pub use transaction::{ConfirmedTransaction, TransactionHandle};
pub use types::{Chain, Network};
