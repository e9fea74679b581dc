//! Cross-chain address encoding
//!
//! Both chains identify accounts by the same 20-byte value:
//!
//! - XRPL: `r...` base58check with the ripple alphabet, version byte `0x00`,
//!   where the 20 bytes are `RIPEMD160(SHA256(public_key))`
//! - XRPL EVM: `0x` + 40 hex chars
//!
//! The translators here move between the two renderings and produce the hex
//! text carried inside XRPL memos.

use eyre::{eyre, Result};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::BridgeError;

/// Version byte prefixed to an account ID before base58check encoding
const ACCOUNT_ID_VERSION: u8 = 0x00;

// ============================================================================
// XRPL Accounts
// ============================================================================

/// Decode an `r...` classic address into its 20-byte account ID
pub fn decode_xrpl_address(addr: &str) -> Result<[u8; 20]> {
    let payload = bs58::decode(addr.trim())
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(None)
        .into_vec()
        .map_err(|e| eyre!("Invalid XRPL address {}: {}", addr, e))?;

    if payload.len() != 21 {
        return Err(eyre!(
            "Invalid XRPL address payload length: expected 21 bytes, got {}",
            payload.len()
        ));
    }
    if payload[0] != ACCOUNT_ID_VERSION {
        return Err(eyre!(
            "Invalid XRPL address version byte: 0x{:02x}",
            payload[0]
        ));
    }

    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(&payload[1..]);
    Ok(account_id)
}

/// Encode a 20-byte account ID as an `r...` classic address
pub fn encode_xrpl_address(account_id: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(ACCOUNT_ID_VERSION);
    payload.extend_from_slice(account_id);

    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check()
        .into_string()
}

/// Account ID for a 33-byte XRPL public key (secp256k1 compressed or 0xED-prefixed ed25519)
pub fn account_id_from_public_key(public_key: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(public_key);
    let ripe = Ripemd160::digest(sha);

    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(&ripe);
    account_id
}

// ============================================================================
// EVM Addresses
// ============================================================================

/// Parse a hex EVM address (with or without 0x prefix) to 20 bytes
pub fn parse_evm_address(addr: &str) -> Result<[u8; 20]> {
    let hex_str = addr.strip_prefix("0x").unwrap_or(addr);

    if hex_str.len() != 40 {
        return Err(eyre!(
            "Invalid EVM address length: expected 40 hex chars, got {}",
            hex_str.len()
        ));
    }

    let bytes = hex::decode(hex_str)?;

    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes);
    Ok(result)
}

/// Encode 20 bytes to EVM hex string with 0x prefix
pub fn encode_evm_address(bytes: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================================================
// Translators
// ============================================================================

/// EVM-style rendering of an XRPL account: `0x` + lowercase hex of the account ID.
///
/// This is the destination encoding the interchain token service expects for
/// transfers landing on XRPL.
pub fn contract_address_from_ledger_address(addr: &str) -> Result<String, BridgeError> {
    let account_id =
        decode_xrpl_address(addr).map_err(|e| BridgeError::invalid_address(addr, e.to_string()))?;
    Ok(encode_evm_address(&account_id))
}

/// `r...` rendering of a 20-byte EVM address
pub fn ledger_account_from_contract_address(addr: &str) -> Result<String, BridgeError> {
    let raw =
        parse_evm_address(addr).map_err(|e| BridgeError::invalid_address(addr, e.to_string()))?;
    Ok(encode_xrpl_address(&raw))
}

/// Strip an optional `0x` and hex-encode the remaining ASCII text (uppercase).
///
/// Used for memo payloads that are not already hex.
pub fn ledger_hex_from_contract_address(addr: &str) -> String {
    string_to_hex(addr.strip_prefix("0x").unwrap_or(addr))
}

/// Uppercase hex of the UTF-8 bytes of `s`
pub fn string_to_hex(s: &str) -> String {
    hex::encode_upper(s.as_bytes())
}

/// True when `s` is non-empty, even-length hex (an optional `0x` allowed)
pub fn is_hex(s: &str) -> bool {
    let body = s.strip_prefix("0x").unwrap_or(s);
    !body.is_empty() && body.len() % 2 == 0 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const GENESIS_ID: &str = "b5f762798a53d543a014caf8b297cff8f2f937e8";

    #[test]
    fn test_xrpl_address_decode() {
        let id = decode_xrpl_address(GENESIS).unwrap();
        assert_eq!(hex::encode(id), GENESIS_ID);
    }

    #[test]
    fn test_xrpl_address_encode_decode() {
        let id = decode_xrpl_address(GENESIS).unwrap();
        assert_eq!(encode_xrpl_address(&id), GENESIS);

        // ACCOUNT_ZERO
        assert_eq!(encode_xrpl_address(&[0u8; 20]), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
    }

    #[test]
    fn test_xrpl_address_rejects_bad_checksum() {
        // last character altered
        assert!(decode_xrpl_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTi").is_err());
        assert!(decode_xrpl_address("0xb5f762798a53d543a014caf8b297cff8f2f937e8").is_err());
        assert!(decode_xrpl_address("").is_err());
    }

    #[test]
    fn test_contract_address_from_ledger_address() {
        let evm = contract_address_from_ledger_address(GENESIS).unwrap();
        assert_eq!(evm, format!("0x{}", GENESIS_ID));

        let err = contract_address_from_ledger_address("not-an-address").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAddress { .. }));
    }

    #[test]
    fn test_ledger_account_roundtrip() {
        let evm = contract_address_from_ledger_address(GENESIS).unwrap();
        assert_eq!(ledger_account_from_contract_address(&evm).unwrap(), GENESIS);
    }

    #[test]
    fn test_ledger_hex_from_contract_address() {
        assert_eq!(ledger_hex_from_contract_address("0xab"), "6162");
        assert_eq!(ledger_hex_from_contract_address("hello"), "68656C6C6F");
        assert_eq!(ledger_hex_from_contract_address(""), "");
    }

    #[test]
    fn test_is_hex() {
        assert!(is_hex("0xdeadBEEF"));
        assert!(is_hex("00"));
        assert!(!is_hex("0x"));
        assert!(!is_hex("abc"));
        assert!(!is_hex("hello world"));
    }

    #[test]
    fn test_evm_address_parse() {
        let raw = parse_evm_address("0x1a7580C2ef5D485E069B7cf1DF9f6478603024d3").unwrap();
        assert_eq!(
            encode_evm_address(&raw),
            "0x1a7580c2ef5d485e069b7cf1df9f6478603024d3"
        );
        assert!(parse_evm_address("0x1234").is_err());
        assert!(parse_evm_address(&format!("0x{}", "zz".repeat(20))).is_err());
    }
}
