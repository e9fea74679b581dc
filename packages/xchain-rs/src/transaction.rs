//! Uniform transaction lifecycle
//!
//! Every transfer returns a [`TransactionHandle`] as soon as the chain accepts
//! it. [`TransactionHandle::wait`] runs the chain's [`ConfirmationStrategy`]
//! and yields a [`ConfirmedTransaction`]:
//!
//! - [`ReceiptWait`] - XRPL EVM: poll for the receipt, fail on revert
//! - [`LedgerValidationPoll`] - XRPL: look the hash up until a validated
//!   ledger contains it, bounded by `max_attempts`

use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::TxHash;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{PollingConfig, ReceiptConfig};
use crate::error::BridgeError;
use crate::evm::EvmChainClient;
use crate::types::Chain;
use crate::xrpl::LedgerClient;

// ============================================================================
// Handles
// ============================================================================

/// Chain-specific details of a confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationDetails {
    Evm {
        block_number: Option<u64>,
    },
    Xrpl {
        ledger_index: Option<u64>,
        /// `meta.TransactionResult`
        transaction_result: Option<String>,
        /// Lookups performed, the successful one included
        attempts: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub chain: Chain,
    pub hash: String,
    pub details: ConfirmationDetails,
}

impl ConfirmedTransaction {
    pub fn is_confirmed(&self) -> bool {
        true
    }
}

/// Turns a submitted hash into a confirmed transaction
#[async_trait]
pub trait ConfirmationStrategy: Send + Sync {
    async fn confirm(&self, hash: &str) -> Result<ConfirmedTransaction, BridgeError>;
}

/// A submitted, not yet confirmed transaction
pub struct TransactionHandle {
    chain: Chain,
    hash: String,
    strategy: Box<dyn ConfirmationStrategy>,
}

impl TransactionHandle {
    pub fn new(chain: Chain, hash: impl Into<String>, strategy: Box<dyn ConfirmationStrategy>) -> Self {
        Self {
            chain,
            hash: hash.into(),
            strategy,
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn is_confirmed(&self) -> bool {
        false
    }

    /// Wait for finality. Consumes the handle.
    pub async fn wait(self) -> Result<ConfirmedTransaction, BridgeError> {
        self.strategy.confirm(&self.hash).await
    }
}

impl std::fmt::Debug for TransactionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("chain", &self.chain)
            .field("hash", &self.hash)
            .field("confirmed", &false)
            .finish()
    }
}

// ============================================================================
// XRPL EVM: receipt wait
// ============================================================================

pub struct ReceiptWait {
    client: Arc<dyn EvmChainClient>,
    tx_hash: TxHash,
    config: ReceiptConfig,
}

impl ReceiptWait {
    pub fn new(client: Arc<dyn EvmChainClient>, tx_hash: TxHash, config: ReceiptConfig) -> Self {
        Self {
            client,
            tx_hash,
            config,
        }
    }
}

#[async_trait]
impl ConfirmationStrategy for ReceiptWait {
    async fn confirm(&self, hash: &str) -> Result<ConfirmedTransaction, BridgeError> {
        let start = Instant::now();

        let receipt = loop {
            match self.client.transaction_receipt(self.tx_hash).await {
                Ok(Some(receipt)) => break Some(receipt),
                Ok(None) => {}
                Err(e) => {
                    warn!(hash = %hash, error = %e, "Receipt lookup failed, retrying");
                }
            }
            if start.elapsed() >= self.config.timeout() {
                break None;
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        };

        let receipt = receipt.ok_or_else(|| BridgeError::TransactionNotMined {
            hash: hash.to_string(),
        })?;

        if !receipt.success {
            return Err(BridgeError::TransactionReverted {
                hash: hash.to_string(),
                block_number: receipt.block_number,
            });
        }

        info!(hash = %hash, block = ?receipt.block_number, "XRPL EVM transaction confirmed");
        Ok(ConfirmedTransaction {
            chain: Chain::XrplEvm,
            hash: hash.to_string(),
            details: ConfirmationDetails::Evm {
                block_number: receipt.block_number,
            },
        })
    }
}

// ============================================================================
// XRPL: poll for validation
// ============================================================================

pub struct LedgerValidationPoll {
    client: Arc<dyn LedgerClient>,
    config: PollingConfig,
}

impl LedgerValidationPoll {
    pub fn new(client: Arc<dyn LedgerClient>, config: PollingConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ConfirmationStrategy for LedgerValidationPoll {
    async fn confirm(&self, hash: &str) -> Result<ConfirmedTransaction, BridgeError> {
        // at least one lookup, even when configured with zero attempts
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.client.transaction(hash).await {
                Ok(lookup) if lookup.found && lookup.validated => {
                    info!(
                        hash = %hash,
                        ledger_index = ?lookup.ledger_index,
                        result = ?lookup.transaction_result,
                        attempts = attempt,
                        "XRPL transaction validated"
                    );
                    return Ok(ConfirmedTransaction {
                        chain: Chain::Xrpl,
                        hash: hash.to_string(),
                        details: ConfirmationDetails::Xrpl {
                            ledger_index: lookup.ledger_index,
                            transaction_result: lookup.transaction_result,
                            attempts: attempt,
                        },
                    });
                }
                Ok(lookup) => {
                    debug!(
                        hash = %hash,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        found = lookup.found,
                        "XRPL transaction not validated yet"
                    );
                }
                Err(e) => {
                    warn!(hash = %hash, attempt = attempt, error = %e, "XRPL tx lookup failed");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        Err(BridgeError::ConfirmationTimeout {
            hash: hash.to_string(),
            attempts: max_attempts,
        })
    }
}
