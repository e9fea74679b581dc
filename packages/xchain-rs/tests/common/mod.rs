//! In-memory chain clients for bridge integration tests
//!
//! - `MockLedger` - records autofilled payments and submitted blobs, answers
//!   `tx` lookups from a script
//! - `MockEvm` - counts (and can fail) token reads and captures
//!   `interchainTransfer` calls

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, b256, Address, TxHash, B256};
use async_trait::async_trait;
use eyre::{eyre, Result};

use xchain_rs::config::{resolve, BridgeConfig, BridgeOverrides};
use xchain_rs::evm::{EvmChainClient, EvmConnection, EvmReceipt, InterchainTransferCall};
use xchain_rs::xrpl::{
    LedgerClient, LedgerWallet, Payment, SubmitResponse, TxLookup, XrplConnection, XrplWallet,
};
use xchain_rs::{Bridge, Network};

pub const XRPL_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
pub const XRPL_ADDRESS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
// anvil's first dev account
pub const EVM_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const EVM_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const TOKEN: Address = address!("1a7580C2ef5D485E069B7cf1DF9f6478603024d3");
pub const TOKEN_ID: B256 =
    b256!("42a4a2b5d5e4f8d2c1b0a99887766554433221100ffeeddccbbaa99887766554");
pub const TX_HASH: TxHash =
    b256!("0000000000000000000000000000000000000000000000000000000000c0ffee");

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// XRPL
// ============================================================================

/// What `tx` lookups report
#[derive(Debug, Clone, Copy)]
pub enum LookupScript {
    /// Found and validated on the n-th lookup
    ValidatedOn(u32),
    /// Found but never validated
    NeverValidated,
    /// Every lookup errors
    AlwaysFails,
}

pub struct MockLedger {
    connected: AtomicBool,
    pub connects: AtomicUsize,
    pub lookups: AtomicU32,
    pub autofilled: Mutex<Vec<Payment>>,
    pub submitted: Mutex<Vec<String>>,
    engine_result: String,
    return_hash: bool,
    script: LookupScript,
}

impl MockLedger {
    pub fn new(script: LookupScript) -> Self {
        Self {
            connected: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            lookups: AtomicU32::new(0),
            autofilled: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            engine_result: "tesSUCCESS".to_string(),
            return_hash: true,
            script,
        }
    }

    pub fn with_engine_result(mut self, engine_result: &str) -> Self {
        self.engine_result = engine_result.to_string();
        self
    }

    pub fn without_hash(mut self) -> Self {
        self.return_hash = false;
        self
    }

    pub fn last_payment(&self) -> Payment {
        self.autofilled
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no payment autofilled")
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn autofill(&self, mut tx: Payment) -> Result<Payment> {
        tx.fee.get_or_insert(12);
        tx.sequence.get_or_insert(7);
        tx.last_ledger_sequence.get_or_insert(1_020);
        self.autofilled.lock().unwrap().push(tx.clone());
        Ok(tx)
    }

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse> {
        self.submitted.lock().unwrap().push(tx_blob.to_string());
        let hash = xchain_rs::xrpl::codec::transaction_hash(&hex::decode(tx_blob)?);
        Ok(SubmitResponse {
            engine_result: self.engine_result.clone(),
            engine_result_message: None,
            hash: self.return_hash.then_some(hash),
        })
    }

    async fn transaction(&self, hash: &str) -> Result<TxLookup> {
        let attempt = self.lookups.fetch_add(1, Ordering::SeqCst) + 1;
        match self.script {
            LookupScript::ValidatedOn(n) if attempt >= n => Ok(TxLookup {
                hash: hash.to_string(),
                found: true,
                validated: true,
                ledger_index: Some(1_005),
                transaction_result: Some("tesSUCCESS".to_string()),
            }),
            LookupScript::ValidatedOn(_) => Ok(TxLookup::not_found(hash)),
            LookupScript::NeverValidated => Ok(TxLookup {
                hash: hash.to_string(),
                found: true,
                validated: false,
                ledger_index: None,
                transaction_result: None,
            }),
            LookupScript::AlwaysFails => Err(eyre!("connection reset")),
        }
    }
}

// ============================================================================
// XRPL EVM
// ============================================================================

pub struct MockEvm {
    signer: Option<Address>,
    decimals: u8,
    receipt_success: Option<bool>,
    /// While set, `decimals()` errors
    pub fail_decimals: AtomicBool,
    /// While set, `interchainTokenId()` errors
    pub fail_token_id: AtomicBool,
    pub decimals_calls: AtomicUsize,
    pub token_id_calls: AtomicUsize,
    pub transfers: Mutex<Vec<InterchainTransferCall>>,
}

impl MockEvm {
    pub fn new(signer: Option<Address>, decimals: u8) -> Self {
        Self {
            signer,
            decimals,
            receipt_success: Some(true),
            fail_decimals: AtomicBool::new(false),
            fail_token_id: AtomicBool::new(false),
            decimals_calls: AtomicUsize::new(0),
            token_id_calls: AtomicUsize::new(0),
            transfers: Mutex::new(Vec::new()),
        }
    }

    /// `None` keeps the transaction unmined forever
    pub fn with_receipt(mut self, success: Option<bool>) -> Self {
        self.receipt_success = success;
        self
    }

    pub fn with_failing_decimals(self) -> Self {
        self.fail_decimals.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_failing_token_id(self) -> Self {
        self.fail_token_id.store(true, Ordering::SeqCst);
        self
    }

    pub fn last_transfer(&self) -> InterchainTransferCall {
        self.transfers
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no interchainTransfer sent")
    }
}

#[async_trait]
impl EvmChainClient for MockEvm {
    fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    async fn decimals(&self, _token: Address) -> Result<u8> {
        self.decimals_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_decimals.load(Ordering::SeqCst) {
            return Err(eyre!("execution reverted"));
        }
        Ok(self.decimals)
    }

    async fn interchain_token_id(&self, _token: Address) -> Result<B256> {
        self.token_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_token_id.load(Ordering::SeqCst) {
            return Err(eyre!("execution reverted"));
        }
        Ok(TOKEN_ID)
    }

    async fn interchain_transfer(&self, call: InterchainTransferCall) -> Result<TxHash> {
        self.transfers.lock().unwrap().push(call);
        Ok(TX_HASH)
    }

    async fn transaction_receipt(&self, _hash: TxHash) -> Result<Option<EvmReceipt>> {
        Ok(self.receipt_success.map(|success| EvmReceipt {
            success,
            block_number: Some(42),
        }))
    }
}

// ============================================================================
// Bridge Assembly
// ============================================================================

/// Testnet config with both credentials and fast polling
pub fn test_config() -> BridgeConfig {
    let mut config = resolve(
        Network::Testnet,
        BridgeOverrides::default()
            .with_xrpl_seed(XRPL_SEED)
            .with_evm_private_key(EVM_KEY),
    )
    .expect("resolve testnet");
    config.xrpl.confirmation.interval_ms = 1;
    config.xrpl.confirmation.max_attempts = 3;
    config.evm.receipt.poll_interval_ms = 1;
    config.evm.receipt.timeout_ms = 20;
    config
}

pub fn bridge_with(
    config: BridgeConfig,
    ledger: Arc<MockLedger>,
    with_wallet: bool,
    evm: Arc<MockEvm>,
) -> Bridge {
    let wallet = with_wallet.then(|| {
        Arc::new(XrplWallet::from_seed(XRPL_SEED).expect("genesis seed")) as Arc<dyn LedgerWallet>
    });
    let xrpl = XrplConnection::with_client(ledger, wallet);
    let evm = EvmConnection::with_client(evm);
    Bridge::new(config, xrpl, evm)
}
