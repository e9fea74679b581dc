//! Transfer orchestration between XRPL and XRPL EVM
//!
//! [`Bridge`] owns one connection per chain, the resolved configuration and a
//! token info cache. Transfers pick their direction from the asset:
//!
//! - EVM assets call `interchainTransfer` on the interchain token service
//! - XRP and issued assets send a Payment to the XRPL gateway with the
//!   message in its memos
//!
//! ## Submodules
//!
//! - `memo` - memo tags and layout of the interchain message
//! - `options` - per-direction overrides

pub mod memo;
pub mod options;

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use eyre::eyre;
use tracing::{debug, info, warn};

use crate::address_codec::{contract_address_from_ledger_address, parse_evm_address};
use crate::amount::{parse_decimal, scale_amount, xrp_to_drops};
use crate::asset::{is_contract_asset, resolve_evm_asset, Asset, AssetInfoCache, EvmAsset};
use crate::config::{self, BridgeConfig, BridgeOverrides};
use crate::currency::normalize_currency_code;
use crate::error::{BridgeError, Result};
use crate::evm::{EvmConnection, InterchainTransferCall};
use crate::transaction::{LedgerValidationPoll, ReceiptWait, TransactionHandle};
use crate::types::{Chain, Network};
use crate::xrpl::codec::issued_value_bits;
use crate::xrpl::{IssuedAmount, Payment, XrplAmount, XrplConnection};

pub use memo::{InterchainMessage, MessageKind};
pub use options::{EvmTransferOptions, TransferOptions, XrplTransferOptions};

/// Cross-chain transfer client
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    xrpl: XrplConnection,
    evm: EvmConnection,
    asset_info: AssetInfoCache,
}

impl Bridge {
    /// Resolve the configuration for `network` and open both connections
    pub fn from_config(network: Network, overrides: BridgeOverrides) -> Result<Self> {
        let config = config::resolve(network, overrides)?;

        let xrpl = XrplConnection::create(
            &config.xrpl.provider_url,
            config.xrpl.seed.as_ref().map(|s| s.expose()),
        )?;
        let evm = EvmConnection::create(
            &config.evm.provider_url,
            config.evm.private_key.as_ref().map(|k| k.expose()),
        )?;

        info!(
            network = %config.network,
            xrpl_signer = config.has_xrpl_signer(),
            evm_signer = config.has_evm_signer(),
            "Bridge initialized"
        );
        Ok(Self::new(config, xrpl, evm))
    }

    /// Assemble a bridge from existing connections
    pub fn new(config: BridgeConfig, xrpl: XrplConnection, evm: EvmConnection) -> Self {
        Self {
            config,
            xrpl,
            evm,
            asset_info: AssetInfoCache::new(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn xrpl(&self) -> &XrplConnection {
        &self.xrpl
    }

    pub fn evm(&self) -> &EvmConnection {
        &self.evm
    }

    pub fn asset_info(&self) -> &AssetInfoCache {
        &self.asset_info
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Move `asset` to `destination` on the other chain.
    ///
    /// `destination` is an `r...` address for EVM assets and a `0x...`
    /// address otherwise.
    pub async fn transfer(
        &self,
        asset: &Asset,
        destination: &str,
        options: TransferOptions,
    ) -> Result<TransactionHandle> {
        match asset {
            Asset::Evm(evm_asset) => {
                self.transfer_evm_to_xrpl(evm_asset, destination, options.evm)
                    .await
            }
            Asset::Xrp(_) | Asset::Issued(_) => {
                self.transfer_xrpl_to_evm(asset, destination, options.xrpl)
                    .await
            }
        }
    }

    /// `interchainTransfer` of an XRPL EVM token to an XRPL account
    pub async fn transfer_evm_to_xrpl(
        &self,
        asset: &EvmAsset,
        destination: &str,
        options: EvmTransferOptions,
    ) -> Result<TransactionHandle> {
        if !self.evm.has_signer() {
            return Err(BridgeError::MissingCredential {
                chain: Chain::XrplEvm,
            });
        }

        let client = self.evm.client();
        let resolved = resolve_evm_asset(asset, client.as_ref(), &self.asset_info).await?;
        let amount = scale_amount(&resolved.amount, resolved.decimals)?;

        let destination_hex = contract_address_from_ledger_address(destination)?;
        let destination_bytes = Bytes::from(
            parse_evm_address(&destination_hex)
                .map_err(|e| BridgeError::invalid_address(destination, e.to_string()))?
                .to_vec(),
        );

        let service = parse_contract_address(&self.config.evm.interchain_token_service_address)?;
        let gas_value = match options.interchain_gas_value {
            Some(value) => value,
            None => parse_wei(&self.config.evm.interchain_gas_value)?,
        };
        let value = match options.gas_value {
            Some(value) => value,
            None => parse_wei(&self.config.evm.gas_value)?,
        };

        let call = InterchainTransferCall {
            service,
            token_id: resolved.token_id,
            destination_chain: self.config.xrpl.chain_id.clone(),
            destination_address: destination_bytes,
            amount,
            metadata: Bytes::new(),
            gas_value,
            value,
            gas_limit: options.gas_limit,
        };

        let tx_hash: TxHash = client
            .interchain_transfer(call)
            .await
            .map_err(BridgeError::rpc(Chain::XrplEvm))?;

        info!(
            hash = %tx_hash,
            token = %resolved.address,
            amount = %amount,
            destination = %destination,
            destination_chain = %self.config.xrpl.chain_id,
            "Submitted interchainTransfer"
        );

        let strategy = ReceiptWait::new(Arc::clone(client), tx_hash, self.config.evm.receipt);
        Ok(TransactionHandle::new(
            Chain::XrplEvm,
            tx_hash.to_string(),
            Box::new(strategy),
        ))
    }

    /// Payment of XRP or an issued token to the gateway, for an XRPL EVM
    /// address
    pub async fn transfer_xrpl_to_evm(
        &self,
        asset: &Asset,
        destination: &str,
        options: XrplTransferOptions,
    ) -> Result<TransactionHandle> {
        self.submit_interchain_payment(
            MessageKind::InterchainTransfer,
            asset,
            destination,
            options.payload.as_deref(),
            options.gas_fee_amount.as_deref(),
        )
        .await
    }

    /// Payment to the gateway that delivers `asset` together with `payload`
    /// to a contract on XRPL EVM
    pub async fn call_contract(
        &self,
        asset: &Asset,
        destination_contract: &str,
        payload: &str,
        options: XrplTransferOptions,
    ) -> Result<TransactionHandle> {
        self.submit_interchain_payment(
            MessageKind::CallContract,
            asset,
            destination_contract,
            Some(payload),
            options.gas_fee_amount.as_deref(),
        )
        .await
    }

    // ========================================================================
    // XRPL submission
    // ========================================================================

    async fn submit_interchain_payment(
        &self,
        kind: MessageKind,
        asset: &Asset,
        destination: &str,
        payload: Option<&str>,
        gas_fee_override: Option<&str>,
    ) -> Result<TransactionHandle> {
        let unsupported = || BridgeError::UnsupportedDirection {
            asset: asset.kind(),
            operation: kind.as_str(),
        };
        if is_contract_asset(asset) {
            return Err(unsupported());
        }

        let wallet = self
            .xrpl
            .wallet()
            .ok_or(BridgeError::MissingCredential { chain: Chain::Xrpl })?;

        let (amount, gas_fee_amount) = match asset {
            Asset::Xrp(xrp) => (
                XrplAmount::Drops(xrp_to_drops(&xrp.amount)?),
                gas_fee_override.unwrap_or(self.config.xrpl.gas_fee_amount.as_str()),
            ),
            Asset::Issued(issued) => {
                parse_decimal(&issued.amount)?;
                let value = issued.amount.trim().to_string();
                issued_value_bits(&value)
                    .map_err(|e| BridgeError::invalid_amount(&issued.amount, e.to_string()))?;
                let amount = XrplAmount::Issued(IssuedAmount {
                    currency: normalize_currency_code(&issued.currency)?,
                    issuer: issued.issuer.clone(),
                    value,
                });
                (amount, memo::ISSUED_ASSET_GAS_FEE)
            }
            Asset::Evm(_) => return Err(unsupported()),
        };

        let destination_raw = parse_evm_address(destination)
            .map_err(|e| BridgeError::invalid_address(destination, e.to_string()))?;
        let destination_address = hex::encode_upper(destination_raw);

        let gateway = self.config.xrpl.gateway_address.trim();
        if gateway.is_empty() {
            return Err(BridgeError::invalid_address(
                gateway,
                format!("no XRPL gateway configured for {}", self.config.network),
            ));
        }

        let memos = InterchainMessage {
            kind,
            destination_address: &destination_address,
            destination_chain: &self.config.evm.chain_id,
            gas_fee_amount,
            payload,
        }
        .memos()?;

        let payment = Payment::new(wallet.address(), gateway, amount).with_memos(memos);

        self.xrpl.ensure_connected().await?;
        let client = self.xrpl.client();
        let payment = client
            .autofill(payment)
            .await
            .map_err(BridgeError::rpc(Chain::Xrpl))?;
        if !payment.is_autofilled() {
            return Err(BridgeError::Rpc {
                chain: Chain::Xrpl,
                cause: eyre!("autofill left Sequence, Fee or LastLedgerSequence unset"),
            });
        }
        debug!(tx = %payment.to_json(), "Autofilled XRPL payment");

        let signed = wallet.sign(&payment).map_err(|e| BridgeError::Submission {
            reason: format!("signing failed: {}", e),
        })?;

        let response = client
            .submit(&signed.tx_blob)
            .await
            .map_err(BridgeError::rpc(Chain::Xrpl))?;

        if response.is_rejected() {
            warn!(
                engine_result = %response.engine_result,
                message = ?response.engine_result_message,
                "XRPL rejected payment"
            );
            return Err(BridgeError::Submission {
                reason: format!(
                    "{}: {}",
                    response.engine_result,
                    response.engine_result_message.as_deref().unwrap_or("rejected")
                ),
            });
        }
        if response.engine_result != "tesSUCCESS" {
            warn!(
                engine_result = %response.engine_result,
                "XRPL payment provisionally not applied"
            );
        }

        let hash = response.hash.ok_or_else(|| BridgeError::Submission {
            reason: "submit response carried no transaction hash".to_string(),
        })?;

        info!(
            hash = %hash,
            kind = %kind,
            account = %payment.account,
            destination = %destination,
            destination_chain = %self.config.evm.chain_id,
            engine_result = %response.engine_result,
            "Submitted XRPL payment"
        );

        let strategy =
            LedgerValidationPoll::new(Arc::clone(client), self.config.xrpl.confirmation);
        Ok(TransactionHandle::new(Chain::Xrpl, hash, Box::new(strategy)))
    }
}

fn parse_contract_address(address: &str) -> Result<Address> {
    Address::from_str(address.trim())
        .map_err(|e| BridgeError::invalid_address(address, e.to_string()))
}

fn parse_wei(value: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|e| BridgeError::invalid_amount(value, e.to_string()))
}
