//! XRPL EVM RPC client
//!
//! [`EvmChainClient`] is the seam the bridge talks to; [`AlloyEvmClient`] is
//! its JSON-RPC implementation over an alloy HTTP provider. [`EvmConnection`]
//! bundles the client with the optional signing key.

use std::sync::Arc;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, B256, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result};
use tracing::info;

use super::contracts::{InterchainToken, InterchainTokenService};
use crate::error::BridgeError;
use crate::types::Chain;

// ============================================================================
// Client Seam
// ============================================================================

/// Arguments of `InterchainTokenService.interchainTransfer` plus the envelope
/// of the transaction that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchainTransferCall {
    /// Token service contract receiving the call
    pub service: Address,
    pub token_id: B256,
    pub destination_chain: String,
    pub destination_address: Bytes,
    pub amount: U256,
    pub metadata: Bytes,
    /// Interchain gas paid for execution on the destination chain
    pub gas_value: U256,
    /// Native value attached to the transaction
    pub value: U256,
    pub gas_limit: Option<u64>,
}

impl InterchainTransferCall {
    pub fn calldata(&self) -> Bytes {
        InterchainTokenService::interchainTransferCall {
            tokenId: self.token_id,
            destinationChain: self.destination_chain.clone(),
            destinationAddress: self.destination_address.clone(),
            amount: self.amount,
            metadata: self.metadata.clone(),
            gasValue: self.gas_value,
        }
        .abi_encode()
        .into()
    }
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmReceipt {
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Operations the bridge needs from the contract chain
#[async_trait]
pub trait EvmChainClient: Send + Sync {
    /// Address of the configured signer, if any
    fn signer_address(&self) -> Option<Address>;

    async fn decimals(&self, token: Address) -> Result<u8>;

    async fn interchain_token_id(&self, token: Address) -> Result<B256>;

    /// Sign and broadcast; returns as soon as the node accepts the transaction
    async fn interchain_transfer(&self, call: InterchainTransferCall) -> Result<TxHash>;

    /// `None` while the transaction is not yet mined
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<EvmReceipt>>;
}

// ============================================================================
// Alloy Implementation
// ============================================================================

/// JSON-RPC client backed by an alloy provider
pub struct AlloyEvmClient<P> {
    provider: P,
    signer_address: Option<Address>,
}

impl<P> AlloyEvmClient<P> {
    pub fn new(provider: P, signer_address: Option<Address>) -> Self {
        Self {
            provider,
            signer_address,
        }
    }
}

#[async_trait]
impl<P> EvmChainClient for AlloyEvmClient<P>
where
    P: Provider<Http<Client>> + 'static,
{
    fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let contract = InterchainToken::new(token, &self.provider);
        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(|e| eyre!("Failed to get decimals: {}", e))?;
        Ok(decimals._0)
    }

    async fn interchain_token_id(&self, token: Address) -> Result<B256> {
        let contract = InterchainToken::new(token, &self.provider);
        let token_id = contract
            .interchainTokenId()
            .call()
            .await
            .map_err(|e| eyre!("Failed to get interchain token id: {}", e))?;
        Ok(token_id._0)
    }

    async fn interchain_transfer(&self, call: InterchainTransferCall) -> Result<TxHash> {
        if self.signer_address.is_none() {
            return Err(eyre!("No signer configured for XRPL EVM"));
        }

        let mut tx = TransactionRequest::default()
            .with_to(call.service)
            .with_input(call.calldata())
            .with_value(call.value);
        if let Some(gas_limit) = call.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| eyre!("Failed to send interchainTransfer: {}", e))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<EvmReceipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| eyre!("Failed to get receipt for {}: {}", hash, e))?;

        Ok(receipt.map(|r| EvmReceipt {
            success: r.status(),
            block_number: r.block_number,
        }))
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Contract-chain handle: an RPC client plus the optional signer address
#[derive(Clone)]
pub struct EvmConnection {
    client: Arc<dyn EvmChainClient>,
}

impl EvmConnection {
    /// Build an HTTP provider for `provider_url`, carrying a wallet when a
    /// private key is given. No network traffic happens here.
    pub fn create(provider_url: &str, private_key: Option<&str>) -> Result<Self, BridgeError> {
        let provider_url = provider_url.trim();
        if provider_url.is_empty() {
            return Err(BridgeError::NoProvider {
                chain: Chain::XrplEvm,
            });
        }
        let url = url::Url::parse(provider_url).map_err(|e| BridgeError::InvalidProviderUrl {
            chain: Chain::XrplEvm,
            url: provider_url.to_string(),
            cause: eyre!(e),
        })?;

        let client: Arc<dyn EvmChainClient> = match private_key {
            Some(key) => {
                let signer: PrivateKeySigner =
                    key.trim()
                        .parse()
                        .map_err(|e| BridgeError::InvalidCredential {
                            chain: Chain::XrplEvm,
                            cause: eyre!("Invalid private key: {}", e),
                        })?;
                let address = signer.address();
                let wallet = EthereumWallet::from(signer);
                let provider = ProviderBuilder::new()
                    .with_recommended_fillers()
                    .wallet(wallet)
                    .on_http(url);

                info!(rpc_url = %provider_url, address = %address, "Created XRPL EVM client with signer");
                Arc::new(AlloyEvmClient::new(provider, Some(address)))
            }
            None => {
                let provider = ProviderBuilder::new().on_http(url);

                info!(rpc_url = %provider_url, "Created read-only XRPL EVM client");
                Arc::new(AlloyEvmClient::new(provider, None))
            }
        };

        Ok(Self { client })
    }

    /// Wrap an existing client implementation
    pub fn with_client(client: Arc<dyn EvmChainClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn EvmChainClient> {
        &self.client
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.client.signer_address()
    }

    pub fn has_signer(&self) -> bool {
        self.signer_address().is_some()
    }
}

impl std::fmt::Debug for EvmConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmConnection")
            .field("signer_address", &self.signer_address())
            .finish()
    }
}
