//! Interchain memo layout
//!
//! The gateway reads the message from the Payment's memos, always in this
//! order: `type`, `destination_address`, `destination_chain`,
//! `gas_fee_amount`, then an optional `payload`. Every MemoType is the hex of
//! its tag.

use crate::address_codec::{is_hex, ledger_hex_from_contract_address, string_to_hex};
use crate::error::BridgeError;
use crate::xrpl::Memo;

pub const MEMO_TYPE: &str = "type";
pub const MEMO_DESTINATION_ADDRESS: &str = "destination_address";
pub const MEMO_DESTINATION_CHAIN: &str = "destination_chain";
pub const MEMO_GAS_FEE_AMOUNT: &str = "gas_fee_amount";
pub const MEMO_PAYLOAD: &str = "payload";

/// Gas fee declared for issued assets
pub const ISSUED_ASSET_GAS_FEE: &str = "0";

/// Value of the `type` memo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    InterchainTransfer,
    CallContract,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::InterchainTransfer => "interchain_transfer",
            MessageKind::CallContract => "call_contract",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values carried by one interchain message
#[derive(Debug, Clone)]
pub struct InterchainMessage<'a> {
    pub kind: MessageKind,
    /// Uppercase EVM address without `0x`
    pub destination_address: &'a str,
    pub destination_chain: &'a str,
    /// Decimal drops
    pub gas_fee_amount: &'a str,
    pub payload: Option<&'a str>,
}

impl InterchainMessage<'_> {
    pub fn memos(&self) -> Result<Vec<Memo>, BridgeError> {
        let fee = self.gas_fee_amount.trim();
        if fee.is_empty() || !fee.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BridgeError::invalid_amount(
                self.gas_fee_amount,
                "gas fee must be a whole number of drops",
            ));
        }

        let mut memos = vec![
            Memo::new(MEMO_TYPE, string_to_hex(self.kind.as_str())),
            Memo::new(MEMO_DESTINATION_ADDRESS, self.destination_address),
            Memo::new(MEMO_DESTINATION_CHAIN, string_to_hex(self.destination_chain)),
            Memo::new(MEMO_GAS_FEE_AMOUNT, string_to_hex(fee)),
        ];
        if let Some(payload) = self.payload {
            memos.push(Memo::new(MEMO_PAYLOAD, encode_payload(payload)));
        }
        Ok(memos)
    }
}

/// MemoData for a payload: hex passes through without its `0x`, anything
/// else is hex-encoded.
pub fn encode_payload(payload: &str) -> String {
    if is_hex(payload) {
        payload
            .strip_prefix("0x")
            .unwrap_or(payload)
            .to_ascii_uppercase()
    } else {
        ledger_hex_from_contract_address(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: &str = "F39FD6E51AAD88F6F4CE6AB8827279CFFFB92266";

    fn message(payload: Option<&str>) -> InterchainMessage<'_> {
        InterchainMessage {
            kind: MessageKind::InterchainTransfer,
            destination_address: DEST,
            destination_chain: "xrpl-evm",
            gas_fee_amount: "1700000",
            payload,
        }
    }

    #[test]
    fn test_memo_order_and_encoding() {
        let memos = message(None).memos().unwrap();
        let tags: Vec<_> = memos.iter().map(|m| m.tag().unwrap()).collect();
        assert_eq!(
            tags,
            ["type", "destination_address", "destination_chain", "gas_fee_amount"]
        );

        assert_eq!(memos[0].memo_data, string_to_hex("interchain_transfer"));
        assert_eq!(memos[1].memo_data, DEST);
        assert_eq!(memos[2].memo_data, "7872706C2D65766D");
        assert_eq!(memos[3].memo_data, string_to_hex("1700000"));
    }

    #[test]
    fn test_payload_memo_appended_last() {
        let memos = message(Some("0xdeadbeef")).memos().unwrap();
        assert_eq!(memos.len(), 5);
        assert_eq!(memos[4].tag().as_deref(), Some("payload"));
        assert_eq!(memos[4].memo_data, "DEADBEEF");
    }

    #[test]
    fn test_encode_payload() {
        assert_eq!(encode_payload("0xabcd"), "ABCD");
        assert_eq!(encode_payload("abcd"), "ABCD");
        // odd length is not hex data
        assert_eq!(encode_payload("abc"), "616263");
        assert_eq!(encode_payload("hello"), "68656C6C6F");
    }

    #[test]
    fn test_rejects_fractional_gas_fee() {
        let mut msg = message(None);
        msg.gas_fee_amount = "1.5";
        assert!(matches!(
            msg.memos().unwrap_err(),
            BridgeError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn test_message_kind_tags() {
        assert_eq!(MessageKind::InterchainTransfer.to_string(), "interchain_transfer");
        assert_eq!(MessageKind::CallContract.as_str(), "call_contract");
    }
}
