//! XRPL connection handle
//!
//! Holds the ledger client and the optional wallet. The client is connected
//! lazily on first use; concurrent first uses connect once.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::client::{LedgerClient, LedgerWallet, XrplRpcClient};
use super::wallet::XrplWallet;
use crate::error::BridgeError;
use crate::types::Chain;

pub struct XrplConnection {
    client: Arc<dyn LedgerClient>,
    wallet: Option<Arc<dyn LedgerWallet>>,
    connect_lock: Mutex<()>,
}

impl XrplConnection {
    /// Build a JSON-RPC client for `provider_url` and derive the wallet for
    /// `seed`, if given. No network traffic happens here.
    pub fn create(provider_url: &str, seed: Option<&str>) -> Result<Self, BridgeError> {
        let provider_url = provider_url.trim();
        if provider_url.is_empty() {
            return Err(BridgeError::NoProvider { chain: Chain::Xrpl });
        }

        let client =
            XrplRpcClient::new(provider_url).map_err(|cause| BridgeError::InvalidProviderUrl {
                chain: Chain::Xrpl,
                url: provider_url.to_string(),
                cause,
            })?;

        let wallet = seed
            .map(|seed| {
                XrplWallet::from_seed(seed).map_err(|cause| BridgeError::InvalidCredential {
                    chain: Chain::Xrpl,
                    cause,
                })
            })
            .transpose()?;

        match &wallet {
            Some(w) => info!(rpc_url = %provider_url, address = %w.address(), "Created XRPL connection with wallet"),
            None => info!(rpc_url = %provider_url, "Created read-only XRPL connection"),
        }

        Ok(Self::with_client(
            Arc::new(client),
            wallet.map(|w| Arc::new(w) as Arc<dyn LedgerWallet>),
        ))
    }

    /// Wrap existing client / wallet implementations
    pub fn with_client(
        client: Arc<dyn LedgerClient>,
        wallet: Option<Arc<dyn LedgerWallet>>,
    ) -> Self {
        Self {
            client,
            wallet,
            connect_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &Arc<dyn LedgerClient> {
        &self.client
    }

    pub fn wallet(&self) -> Option<&Arc<dyn LedgerWallet>> {
        self.wallet.as_ref()
    }

    /// Connect the client if it is not connected yet
    pub async fn ensure_connected(&self) -> Result<(), BridgeError> {
        if self.client.is_connected().await {
            return Ok(());
        }

        let _guard = self.connect_lock.lock().await;
        if self.client.is_connected().await {
            return Ok(());
        }

        self.client.connect().await.map_err(|e| BridgeError::Rpc {
            chain: Chain::Xrpl,
            cause: e.wrap_err("Failed to connect"),
        })
    }
}

impl std::fmt::Debug for XrplConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XrplConnection")
            .field("wallet", &self.wallet.as_ref().map(|w| w.address().to_string()))
            .finish()
    }
}
