//! XRP Ledger Support Module
//!
//! Payments to the interchain gateway account, signed locally and submitted
//! over rippled JSON-RPC.
//!
//! ## Submodules
//!
//! - `client` - client/wallet seams and the JSON-RPC client
//! - `codec` - canonical binary serialization and transaction hashing
//! - `connection` - lazily connected client + optional wallet
//! - `types` - Payment, Memo and amount shapes
//! - `wallet` - family-seed key derivation and signing

pub mod client;
pub mod codec;
pub mod connection;
pub mod types;
pub mod wallet;

pub use client::{LedgerClient, LedgerWallet, XrplRpcClient};
pub use connection::XrplConnection;
pub use types::{IssuedAmount, Memo, Payment, SignedTransaction, SubmitResponse, TxLookup, XrplAmount};
pub use wallet::{KeyType, XrplWallet};
