//! XRPL EVM support
//!
//! Everything needed to send interchain transfers from the contract chain.
//!
//! ## Submodules
//!
//! - `client` - client seam, alloy JSON-RPC implementation and connection handle
//! - `contracts` - interchain token service bindings using alloy sol! macro

pub mod client;
pub mod contracts;

pub use client::{AlloyEvmClient, EvmChainClient, EvmConnection, EvmReceipt, InterchainTransferCall};
pub use contracts::{InterchainToken, InterchainTokenService};
