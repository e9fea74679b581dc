//! Error types surfaced by the bridge client
//!
//! Chain adapters work in `eyre::Result` internally; the orchestrator maps
//! their failures into [`BridgeError`] so callers can match on the kind.

use thiserror::Error;

use crate::types::Chain;

/// Result alias used across the public API
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// Every failure a transfer, connection or configuration step can report.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ========================================================================
    // Configuration / connection
    // ========================================================================
    /// No signing credential available where one is required
    #[error("No {chain} signer provided")]
    MissingCredential { chain: Chain },

    /// Provider URL absent or empty
    #[error("No RPC URL provided for {chain}")]
    NoProvider { chain: Chain },

    #[error("Invalid {chain} RPC URL {url}: {cause}")]
    InvalidProviderUrl {
        chain: Chain,
        url: String,
        cause: eyre::Report,
    },

    /// Seed or private key could not be turned into a signer
    #[error("Invalid {chain} signing credential: {cause}")]
    InvalidCredential { chain: Chain, cause: eyre::Report },

    // ========================================================================
    // Assets and encodings
    // ========================================================================
    #[error("Failed to read {field} of token {address}: {cause}")]
    AssetInfoUnavailable {
        address: String,
        field: &'static str,
        cause: eyre::Report,
    },

    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid currency code {code:?}: {reason}")]
    InvalidCurrencyCode { code: String, reason: String },

    // ========================================================================
    // Submission and finality
    // ========================================================================
    /// The receipt never appeared
    #[error("Transaction receipt is null for {hash}")]
    TransactionNotMined { hash: String },

    #[error("Transaction reverted unexpectedly: {hash}")]
    TransactionReverted {
        hash: String,
        block_number: Option<u64>,
    },

    #[error("Transaction submission failed: {reason}")]
    Submission { reason: String },

    #[error("Transaction {hash} not validated after {attempts} attempts")]
    ConfirmationTimeout { hash: String, attempts: u32 },

    // ========================================================================
    // Dispatch / transport
    // ========================================================================
    #[error("Unsupported bridge direction: {operation} with {asset} asset")]
    UnsupportedDirection {
        asset: &'static str,
        operation: &'static str,
    },

    #[error("{chain} RPC error: {cause}")]
    Rpc { chain: Chain, cause: eyre::Report },
}

impl BridgeError {
    pub(crate) fn rpc(chain: Chain) -> impl FnOnce(eyre::Report) -> Self {
        move |cause| Self::Rpc { chain, cause }
    }

    pub(crate) fn invalid_amount(amount: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            amount: amount.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that come from a finality check rather than submission
    pub fn is_confirmation_failure(&self) -> bool {
        matches!(
            self,
            Self::TransactionNotMined { .. }
                | Self::TransactionReverted { .. }
                | Self::ConfirmationTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_chain() {
        let err = BridgeError::MissingCredential { chain: Chain::Xrpl };
        assert_eq!(err.to_string(), "No XRPL signer provided");

        let err = BridgeError::MissingCredential {
            chain: Chain::XrplEvm,
        };
        assert_eq!(err.to_string(), "No XRPL EVM signer provided");
    }

    #[test]
    fn test_confirmation_failure_classification() {
        let timeout = BridgeError::ConfirmationTimeout {
            hash: "AB".into(),
            attempts: 3,
        };
        assert!(timeout.is_confirmation_failure());
        assert!(timeout.to_string().contains("3 attempts"));

        let submission = BridgeError::Submission {
            reason: "no hash".into(),
        };
        assert!(!submission.is_confirmation_failure());
    }

    #[test]
    fn test_rpc_mapper_keeps_cause() {
        let err = BridgeError::rpc(Chain::XrplEvm)(eyre::eyre!("connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }
}
