//! XRPL JSON-RPC client
//!
//! [`LedgerClient`] and [`LedgerWallet`] are the seams the bridge uses;
//! [`XrplRpcClient`] implements the client against a rippled JSON-RPC endpoint
//! over HTTP using the `server_info`, `account_info`, `fee`, `ledger_current`,
//! `submit` and `tx` commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::types::{Payment, SignedTransaction, SubmitResponse, TxLookup};

/// Ledgers a transaction may wait before `LastLedgerSequence` expires it
pub const LEDGER_OFFSET: u32 = 20;

// ============================================================================
// Seams
// ============================================================================

#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn connect(&self) -> Result<()>;

    async fn is_connected(&self) -> bool;

    /// Fill `Sequence`, `Fee` and `LastLedgerSequence` where unset
    async fn autofill(&self, tx: Payment) -> Result<Payment>;

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse>;

    async fn transaction(&self, hash: &str) -> Result<TxLookup>;
}

/// Signing credential for the ledger chain
pub trait LedgerWallet: Send + Sync {
    /// Classic `r...` address
    fn address(&self) -> &str;

    fn sign(&self, tx: &Payment) -> Result<SignedTransaction>;
}

// ============================================================================
// JSON-RPC Implementation
// ============================================================================

/// rippled JSON-RPC client over HTTP
pub struct XrplRpcClient {
    url: Url,
    client: Client,
    connected: AtomicBool,
}

impl XrplRpcClient {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url.trim()).wrap_err_with(|| format!("Invalid XRPL RPC URL {}", url))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self {
            url,
            client,
            connected: AtomicBool::new(false),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST a command and return its `result` object, error statuses included
    async fn request_raw(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({ "method": method, "params": [params] });

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .wrap_err_with(|| format!("XRPL {} request failed", method))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "XRPL {} failed: {} - {}",
                method,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let data: Value = response
            .json()
            .await
            .wrap_err_with(|| format!("XRPL {} returned invalid JSON", method))?;

        data.get("result")
            .cloned()
            .ok_or_else(|| eyre!("Missing 'result' field in XRPL {} response", method))
    }

    /// Like [`Self::request_raw`] but turns `status: error` into an `Err`
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let result = self.request_raw(method, params).await?;
        if let Some(code) = rpc_error(&result) {
            let message = result
                .get("error_message")
                .and_then(|v| v.as_str())
                .unwrap_or(code);
            return Err(eyre!("XRPL {} error {}: {}", method, code, message));
        }
        Ok(result)
    }

    async fn next_sequence(&self, account: &str) -> Result<u32> {
        let result = self
            .request(
                "account_info",
                json!({ "account": account, "ledger_index": "current" }),
            )
            .await?;

        let sequence = result
            .get("account_data")
            .and_then(|a| a.get("Sequence"))
            .and_then(|v| v.as_u64())
            .ok_or_else(|| eyre!("Missing account_data.Sequence for {}", account))?;
        u32::try_from(sequence).map_err(|_| eyre!("Sequence {} out of range", sequence))
    }

    async fn open_ledger_fee(&self) -> Result<u64> {
        let result = self.request("fee", json!({})).await?;
        let drops = result
            .get("drops")
            .ok_or_else(|| eyre!("Missing 'drops' field in fee response"))?;

        let read = |field: &str| -> Option<u64> {
            drops
                .get(field)
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
        };
        let base = read("base_fee").ok_or_else(|| eyre!("Missing drops.base_fee"))?;
        Ok(read("open_ledger_fee").map_or(base, |open| open.max(base)))
    }

    async fn current_ledger(&self) -> Result<u32> {
        let result = self.request("ledger_current", json!({})).await?;
        let index = result
            .get("ledger_current_index")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| eyre!("Missing ledger_current_index"))?;
        u32::try_from(index).map_err(|_| eyre!("Ledger index {} out of range", index))
    }
}

fn rpc_error(result: &Value) -> Option<&str> {
    match result.get("status").and_then(|v| v.as_str()) {
        Some("error") => Some(
            result
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown"),
        ),
        _ => None,
    }
}

#[async_trait]
impl LedgerClient for XrplRpcClient {
    async fn connect(&self) -> Result<()> {
        let result = self.request("server_info", json!({})).await?;
        let build = result
            .get("info")
            .and_then(|i| i.get("build_version"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        self.connected.store(true, Ordering::SeqCst);
        info!(url = %self.url, build_version = build, "Connected to XRPL");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn autofill(&self, mut tx: Payment) -> Result<Payment> {
        if tx.sequence.is_none() {
            tx.sequence = Some(self.next_sequence(&tx.account).await?);
        }
        if tx.fee.is_none() {
            tx.fee = Some(self.open_ledger_fee().await?);
        }
        if tx.last_ledger_sequence.is_none() {
            tx.last_ledger_sequence = Some(self.current_ledger().await? + LEDGER_OFFSET);
        }

        debug!(
            account = %tx.account,
            sequence = ?tx.sequence,
            fee = ?tx.fee,
            last_ledger_sequence = ?tx.last_ledger_sequence,
            "Autofilled XRPL payment"
        );
        Ok(tx)
    }

    async fn submit(&self, tx_blob: &str) -> Result<SubmitResponse> {
        let result = self.request("submit", json!({ "tx_blob": tx_blob })).await?;

        let engine_result = result
            .get("engine_result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| eyre!("Missing engine_result in submit response"))?
            .to_string();

        Ok(SubmitResponse {
            engine_result,
            engine_result_message: result
                .get("engine_result_message")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            hash: result
                .get("tx_json")
                .and_then(|t| t.get("hash"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }

    async fn transaction(&self, hash: &str) -> Result<TxLookup> {
        let result = self.request_raw("tx", json!({ "transaction": hash })).await?;
        match rpc_error(&result) {
            Some("txnNotFound") => return Ok(TxLookup::not_found(hash)),
            Some(code) => return Err(eyre!("XRPL tx lookup error {} for {}", code, hash)),
            None => {}
        }

        Ok(TxLookup {
            hash: hash.to_string(),
            found: true,
            validated: result
                .get("validated")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            ledger_index: result.get("ledger_index").and_then(|v| v.as_u64()),
            transaction_result: result
                .get("meta")
                .and_then(|m| m.get("TransactionResult"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}
