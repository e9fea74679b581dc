//! XRPL transaction shapes used by the bridge

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::address_codec::string_to_hex;

/// Payment amount: drops of XRP or an issued-currency value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XrplAmount {
    #[serde(with = "drops_string")]
    Drops(u64),
    Issued(IssuedAmount),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    /// Normalized currency code (3 chars or 40 hex)
    pub currency: String,
    pub issuer: String,
    /// Decimal string; issued currencies have no smallest unit
    pub value: String,
}

/// A MemoType / MemoData pair, both uppercase hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoType")]
    pub memo_type: String,
    #[serde(rename = "MemoData")]
    pub memo_data: String,
}

impl Memo {
    /// Memo whose type is the hex of `tag` and whose data is already hex
    pub fn new(tag: &str, data_hex: impl Into<String>) -> Self {
        Self {
            memo_type: string_to_hex(tag),
            memo_data: data_hex.into().to_ascii_uppercase(),
        }
    }

    /// Decoded memo type tag, if it is valid UTF-8 hex
    pub fn tag(&self) -> Option<String> {
        hex::decode(&self.memo_type)
            .ok()
            .and_then(|b| String::from_utf8(b).ok())
    }
}

/// Payment transaction. Autofill supplies `fee`, `sequence` and
/// `last_ledger_sequence`; signing supplies the key and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub account: String,
    pub destination: String,
    pub amount: XrplAmount,
    pub memos: Vec<Memo>,
    pub flags: u32,
    /// Drops
    pub fee: Option<u64>,
    pub sequence: Option<u32>,
    pub last_ledger_sequence: Option<u32>,
    pub signing_pub_key: Option<String>,
    pub txn_signature: Option<String>,
}

impl Payment {
    pub fn new(account: impl Into<String>, destination: impl Into<String>, amount: XrplAmount) -> Self {
        Self {
            account: account.into(),
            destination: destination.into(),
            amount,
            memos: Vec::new(),
            flags: 0,
            fee: None,
            sequence: None,
            last_ledger_sequence: None,
            signing_pub_key: None,
            txn_signature: None,
        }
    }

    pub fn with_memos(mut self, memos: Vec<Memo>) -> Self {
        self.memos = memos;
        self
    }

    pub fn is_autofilled(&self) -> bool {
        self.fee.is_some() && self.sequence.is_some() && self.last_ledger_sequence.is_some()
    }

    /// rippled JSON form, used for logging and `tx_json` style tooling
    pub fn to_json(&self) -> Value {
        let mut tx = json!({
            "TransactionType": "Payment",
            "Account": self.account,
            "Destination": self.destination,
            "Amount": self.amount,
            "Flags": self.flags,
        });
        if !self.memos.is_empty() {
            tx["Memos"] = Value::Array(
                self.memos
                    .iter()
                    .map(|m| json!({ "Memo": m }))
                    .collect(),
            );
        }
        if let Some(fee) = self.fee {
            tx["Fee"] = json!(fee.to_string());
        }
        if let Some(sequence) = self.sequence {
            tx["Sequence"] = json!(sequence);
        }
        if let Some(lls) = self.last_ledger_sequence {
            tx["LastLedgerSequence"] = json!(lls);
        }
        if let Some(key) = &self.signing_pub_key {
            tx["SigningPubKey"] = json!(key);
        }
        if let Some(sig) = &self.txn_signature {
            tx["TxnSignature"] = json!(sig);
        }
        tx
    }
}

/// Signed, serialized transaction ready for `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Uppercase hex of the canonical binary form
    pub tx_blob: String,
    /// Uppercase hex transaction id
    pub hash: String,
}

/// Response of the `submit` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub engine_result: String,
    pub engine_result_message: Option<String>,
    pub hash: Option<String>,
}

impl SubmitResponse {
    /// Result classes that mean the transaction was never applied and never will be
    pub fn is_rejected(&self) -> bool {
        ["tem", "tef", "tel"]
            .iter()
            .any(|class| self.engine_result.starts_with(class))
    }
}

/// Response of the `tx` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxLookup {
    pub hash: String,
    /// False when the server reports `txnNotFound`
    pub found: bool,
    pub validated: bool,
    pub ledger_index: Option<u64>,
    /// `meta.TransactionResult`, e.g. `tesSUCCESS`
    pub transaction_result: Option<String>,
}

impl TxLookup {
    pub fn not_found(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            found: false,
            validated: false,
            ledger_index: None,
            transaction_result: None,
        }
    }
}

mod drops_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(drops: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&drops.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_json_shapes() {
        assert_eq!(serde_json::to_value(XrplAmount::Drops(10)).unwrap(), json!("10"));

        let issued = XrplAmount::Issued(IssuedAmount {
            currency: "USD".into(),
            issuer: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".into(),
            value: "1.5".into(),
        });
        let value = serde_json::to_value(&issued).unwrap();
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["value"], "1.5");

        let parsed: XrplAmount = serde_json::from_value(json!("2500")).unwrap();
        assert_eq!(parsed, XrplAmount::Drops(2500));
    }

    #[test]
    fn test_memo_tag_encoding() {
        let memo = Memo::new("type", "abcd");
        assert_eq!(memo.memo_type, "74797065");
        assert_eq!(memo.memo_data, "ABCD");
        assert_eq!(memo.tag().as_deref(), Some("type"));
    }

    #[test]
    fn test_payment_json() {
        let payment = Payment::new(
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "rNrjh1KGZk2jBR3wPfAQnoidtFFYQKbQn2",
            XrplAmount::Drops(1_000_000),
        )
        .with_memos(vec![Memo::new("type", "00")]);

        let tx = payment.to_json();
        assert_eq!(tx["TransactionType"], "Payment");
        assert_eq!(tx["Amount"], "1000000");
        assert_eq!(tx["Memos"][0]["Memo"]["MemoType"], "74797065");
        assert!(tx.get("Fee").is_none());
        assert!(!payment.is_autofilled());
    }

    #[test]
    fn test_submit_rejection_classes() {
        let response = |code: &str| SubmitResponse {
            engine_result: code.into(),
            engine_result_message: None,
            hash: Some("AB".into()),
        };
        assert!(response("temBAD_AMOUNT").is_rejected());
        assert!(response("tefPAST_SEQ").is_rejected());
        assert!(!response("tesSUCCESS").is_rejected());
        assert!(!response("terQUEUED").is_rejected());
        assert!(!response("tecPATH_DRY").is_rejected());
    }
}
