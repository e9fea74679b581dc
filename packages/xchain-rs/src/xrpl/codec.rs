//! XRPL canonical binary serialization for Payment transactions
//!
//! Fields are written sorted by (type code, field code). Each one gets a field
//! id header; blobs and account IDs get a variable-length prefix first.
//!
//! ## Supported fields
//!
//! | Field              | Type      | Type code | Field code |
//! |--------------------|-----------|-----------|------------|
//! | TransactionType    | UInt16    | 1         | 2          |
//! | Flags              | UInt32    | 2         | 2          |
//! | Sequence           | UInt32    | 2         | 4          |
//! | LastLedgerSequence | UInt32    | 2         | 27         |
//! | Amount             | Amount    | 6         | 1          |
//! | Fee                | Amount    | 6         | 8          |
//! | SigningPubKey      | Blob      | 7         | 3          |
//! | TxnSignature       | Blob      | 7         | 4          |
//! | MemoType           | Blob      | 7         | 12         |
//! | MemoData           | Blob      | 7         | 13         |
//! | Account            | AccountID | 8         | 1          |
//! | Destination        | AccountID | 8         | 3          |
//! | Memo               | STObject  | 14        | 10         |
//! | Memos              | STArray   | 15        | 9          |

use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use eyre::{eyre, Result, WrapErr};
use sha2::{Digest, Sha512};

use super::types::{IssuedAmount, Memo, Payment, XrplAmount};
use crate::address_codec::decode_xrpl_address;
use crate::currency::currency_code_bytes;

// ============================================================================
// Constants
// ============================================================================

/// Prefix hashed before a transaction's signing fields
pub const HASH_PREFIX_TX_SIGN: [u8; 4] = *b"STX\0";

/// Prefix hashed before a signed blob to form the transaction id
pub const HASH_PREFIX_TX_ID: [u8; 4] = *b"TXN\0";

const TYPE_UINT16: u8 = 1;
const TYPE_UINT32: u8 = 2;
const TYPE_AMOUNT: u8 = 6;
const TYPE_BLOB: u8 = 7;
const TYPE_ACCOUNT_ID: u8 = 8;
const TYPE_OBJECT: u8 = 14;
const TYPE_ARRAY: u8 = 15;

const TRANSACTION_TYPE_PAYMENT: u16 = 0;

const NOT_XRP_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;

const MIN_MANTISSA: u128 = 1_000_000_000_000_000;
const MAX_MANTISSA: u128 = 9_999_999_999_999_999;
const MIN_EXPONENT: i64 = -96;
const MAX_EXPONENT: i64 = 80;
const MAX_SCALE: i64 = 200;

/// First 32 bytes of SHA-512
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    out
}

// ============================================================================
// Transactions
// ============================================================================

/// Serialize a payment. With `signing_only`, `TxnSignature` is left out,
/// giving the fields a signature covers.
pub fn encode_payment(tx: &Payment, signing_only: bool) -> Result<Vec<u8>> {
    let sequence = tx
        .sequence
        .ok_or_else(|| eyre!("Payment is missing Sequence; autofill first"))?;
    let fee = tx
        .fee
        .ok_or_else(|| eyre!("Payment is missing Fee; autofill first"))?;
    let signing_pub_key = tx
        .signing_pub_key
        .as_deref()
        .ok_or_else(|| eyre!("Payment is missing SigningPubKey"))?;

    let mut out = Vec::with_capacity(256);

    write_field_id(&mut out, TYPE_UINT16, 2);
    out.extend_from_slice(&TRANSACTION_TYPE_PAYMENT.to_be_bytes());

    write_field_id(&mut out, TYPE_UINT32, 2);
    out.extend_from_slice(&tx.flags.to_be_bytes());

    write_field_id(&mut out, TYPE_UINT32, 4);
    out.extend_from_slice(&sequence.to_be_bytes());

    if let Some(lls) = tx.last_ledger_sequence {
        write_field_id(&mut out, TYPE_UINT32, 27);
        out.extend_from_slice(&lls.to_be_bytes());
    }

    write_field_id(&mut out, TYPE_AMOUNT, 1);
    out.extend_from_slice(&encode_amount(&tx.amount)?);

    write_field_id(&mut out, TYPE_AMOUNT, 8);
    out.extend_from_slice(&encode_drops(fee)?);

    write_field_id(&mut out, TYPE_BLOB, 3);
    write_blob_hex(&mut out, signing_pub_key).wrap_err("Invalid SigningPubKey")?;

    if !signing_only {
        let signature = tx
            .txn_signature
            .as_deref()
            .ok_or_else(|| eyre!("Payment is missing TxnSignature"))?;
        write_field_id(&mut out, TYPE_BLOB, 4);
        write_blob_hex(&mut out, signature).wrap_err("Invalid TxnSignature")?;
    }

    write_field_id(&mut out, TYPE_ACCOUNT_ID, 1);
    write_account(&mut out, &tx.account)?;

    write_field_id(&mut out, TYPE_ACCOUNT_ID, 3);
    write_account(&mut out, &tx.destination)?;

    if !tx.memos.is_empty() {
        write_field_id(&mut out, TYPE_ARRAY, 9);
        for memo in &tx.memos {
            write_memo(&mut out, memo)?;
        }
        // ArrayEndMarker
        write_field_id(&mut out, TYPE_ARRAY, 1);
    }

    Ok(out)
}

/// Bytes a signature is computed over: `STX\0` followed by the signing fields
pub fn signing_payload(tx: &Payment) -> Result<Vec<u8>> {
    let fields = encode_payment(tx, true)?;
    let mut payload = Vec::with_capacity(HASH_PREFIX_TX_SIGN.len() + fields.len());
    payload.extend_from_slice(&HASH_PREFIX_TX_SIGN);
    payload.extend_from_slice(&fields);
    Ok(payload)
}

/// Transaction id of a signed blob, uppercase hex
pub fn transaction_hash(blob: &[u8]) -> String {
    let mut data = Vec::with_capacity(HASH_PREFIX_TX_ID.len() + blob.len());
    data.extend_from_slice(&HASH_PREFIX_TX_ID);
    data.extend_from_slice(blob);
    hex::encode_upper(sha512_half(&data))
}

fn write_memo(out: &mut Vec<u8>, memo: &Memo) -> Result<()> {
    write_field_id(out, TYPE_OBJECT, 10);
    write_field_id(out, TYPE_BLOB, 12);
    write_blob_hex(out, &memo.memo_type).wrap_err("Invalid MemoType")?;
    write_field_id(out, TYPE_BLOB, 13);
    write_blob_hex(out, &memo.memo_data).wrap_err("Invalid MemoData")?;
    // ObjectEndMarker
    write_field_id(out, TYPE_OBJECT, 1);
    Ok(())
}

// ============================================================================
// Field Primitives
// ============================================================================

fn write_field_id(out: &mut Vec<u8>, type_code: u8, field_code: u8) {
    match (type_code < 16, field_code < 16) {
        (true, true) => out.push((type_code << 4) | field_code),
        (true, false) => {
            out.push(type_code << 4);
            out.push(field_code);
        }
        (false, true) => {
            out.push(field_code);
            out.push(type_code);
        }
        (false, false) => {
            out.push(0);
            out.push(type_code);
            out.push(field_code);
        }
    }
}

/// Variable-length prefix for blobs of up to 918 744 bytes
pub fn encode_vl_length(len: usize) -> Result<Vec<u8>> {
    match len {
        0..=192 => Ok(vec![len as u8]),
        193..=12_480 => {
            let n = len - 193;
            Ok(vec![193 + (n >> 8) as u8, (n & 0xff) as u8])
        }
        12_481..=918_744 => {
            let n = len - 12_481;
            Ok(vec![
                241 + (n >> 16) as u8,
                ((n >> 8) & 0xff) as u8,
                (n & 0xff) as u8,
            ])
        }
        _ => Err(eyre!("Blob of {} bytes exceeds the variable-length limit", len)),
    }
}

fn write_blob_hex(out: &mut Vec<u8>, hex_str: &str) -> Result<()> {
    let bytes = hex::decode(hex_str)?;
    out.extend_from_slice(&encode_vl_length(bytes.len())?);
    out.extend_from_slice(&bytes);
    Ok(())
}

fn write_account(out: &mut Vec<u8>, address: &str) -> Result<()> {
    let account_id = decode_xrpl_address(address)?;
    out.extend_from_slice(&encode_vl_length(account_id.len())?);
    out.extend_from_slice(&account_id);
    Ok(())
}

// ============================================================================
// Amounts
// ============================================================================

pub fn encode_amount(amount: &XrplAmount) -> Result<Vec<u8>> {
    match amount {
        XrplAmount::Drops(drops) => Ok(encode_drops(*drops)?.to_vec()),
        XrplAmount::Issued(issued) => encode_issued(issued),
    }
}

fn encode_drops(drops: u64) -> Result<[u8; 8]> {
    if drops > crate::amount::MAX_DROPS {
        return Err(eyre!("{} drops exceeds the XRP supply", drops));
    }
    Ok((drops | POSITIVE_BIT).to_be_bytes())
}

fn encode_issued(issued: &IssuedAmount) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(48);
    out.extend_from_slice(&issued_value_bits(&issued.value)?.to_be_bytes());
    out.extend_from_slice(
        &currency_code_bytes(&issued.currency).map_err(|e| eyre!("{}", e))?,
    );
    out.extend_from_slice(&decode_xrpl_address(&issued.issuer)?);
    Ok(out)
}

/// 64-bit issued-currency value: not-XRP bit, sign bit, 8-bit exponent
/// (biased by 97) and a mantissa normalized to 16 digits.
pub fn issued_value_bits(value: &str) -> Result<u64> {
    let decimal = BigDecimal::from_str(value.trim())
        .wrap_err_with(|| format!("Invalid issued amount {:?}", value))?
        .normalized();
    let (digits, scale) = decimal.as_bigint_and_exponent();

    let zero = BigInt::from(0);
    if digits == zero {
        return Ok(NOT_XRP_BIT);
    }
    // keeps the normalization loops in i64 range
    if !(-MAX_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(eyre!("Issued amount {} is out of range", value));
    }
    let positive = digits > zero;

    let mut mantissa: u128 = digits
        .magnitude()
        .to_string()
        .parse()
        .map_err(|_| eyre!("Issued amount {} has too many significant digits", value))?;
    let mut exponent = -scale;

    while mantissa < MIN_MANTISSA {
        mantissa *= 10;
        exponent -= 1;
    }
    while mantissa > MAX_MANTISSA {
        if mantissa % 10 != 0 {
            return Err(eyre!(
                "Issued amount {} has more precision than XRPL supports",
                value
            ));
        }
        mantissa /= 10;
        exponent += 1;
    }
    if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
        return Err(eyre!("Issued amount {} is out of range", value));
    }

    let mut bits = NOT_XRP_BIT | (((exponent + 97) as u64) << 54) | mantissa as u64;
    if positive {
        bits |= POSITIVE_BIT;
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const GATEWAY: &str = "rNrjh1KGZk2jBR3wPfAQnoidtFFYQKbQn2";

    fn autofilled_payment() -> Payment {
        let mut tx = Payment::new(GENESIS, GATEWAY, XrplAmount::Drops(10))
            .with_memos(vec![Memo::new("type", "696E74")]);
        tx.fee = Some(12);
        tx.sequence = Some(1);
        tx.last_ledger_sequence = Some(100);
        tx.signing_pub_key =
            Some("0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020".into());
        tx
    }

    #[test]
    fn test_drops_encoding() {
        let encoded = encode_amount(&XrplAmount::Drops(10)).unwrap();
        assert_eq!(hex::encode_upper(encoded), "400000000000000A");
        assert!(encode_drops(crate::amount::MAX_DROPS + 1).is_err());
    }

    #[test]
    fn test_issued_value_encoding() {
        assert_eq!(issued_value_bits("1").unwrap(), 0xD4838D7EA4C68000);
        assert_eq!(issued_value_bits("0").unwrap(), 0x8000000000000000);
        assert_eq!(issued_value_bits("-1").unwrap(), 0x94838D7EA4C68000);
        // same value, different spelling
        assert_eq!(
            issued_value_bits("1.000").unwrap(),
            issued_value_bits("1").unwrap()
        );
        assert!(issued_value_bits("1.2345678901234567").is_err());
        assert!(issued_value_bits("1e200").is_err());
    }

    #[test]
    fn test_issued_value_rejects_extreme_exponents() {
        assert!(issued_value_bits("1e-9223372036854775807").is_err());
        assert!(issued_value_bits("1e9223372036854775807").is_err());
        assert!(issued_value_bits("1e-201").is_err());
        // smallest and largest representable magnitudes still encode
        assert!(issued_value_bits("1e-81").is_ok());
        assert!(issued_value_bits("9999999999999999e80").is_ok());
    }

    #[test]
    fn test_issued_amount_layout() {
        let encoded = encode_amount(&XrplAmount::Issued(IssuedAmount {
            currency: "USD".into(),
            issuer: GENESIS.into(),
            value: "1".into(),
        }))
        .unwrap();
        assert_eq!(encoded.len(), 48);
        assert_eq!(&encoded[20..23], b"USD");
        assert_eq!(
            hex::encode(&encoded[28..]),
            "b5f762798a53d543a014caf8b297cff8f2f937e8"
        );
    }

    #[test]
    fn test_vl_length_boundaries() {
        assert_eq!(encode_vl_length(0).unwrap(), vec![0]);
        assert_eq!(encode_vl_length(192).unwrap(), vec![192]);
        assert_eq!(encode_vl_length(193).unwrap(), vec![193, 0]);
        assert_eq!(encode_vl_length(12_480).unwrap(), vec![240, 255]);
        assert_eq!(encode_vl_length(12_481).unwrap(), vec![241, 0, 0]);
        assert!(encode_vl_length(918_745).is_err());
    }

    #[test]
    fn test_payment_field_order() {
        let tx = autofilled_payment();
        let encoded = encode_payment(&tx, true).unwrap();

        // TransactionType = Payment, Flags = 0, Sequence = 1
        assert_eq!(&encoded[..3], &[0x12, 0x00, 0x00]);
        assert_eq!(&encoded[3..8], &[0x22, 0, 0, 0, 0]);
        assert_eq!(&encoded[8..13], &[0x24, 0, 0, 0, 1]);
        // LastLedgerSequence uses a two-byte field id
        assert_eq!(&encoded[13..19], &[0x20, 0x1B, 0, 0, 0, 100]);
        // Amount
        assert_eq!(encoded[19], 0x61);
        // Memos array closes the object
        assert_eq!(encoded.last(), Some(&0xF1));
    }

    #[test]
    fn test_signing_fields_exclude_signature() {
        let mut tx = autofilled_payment();
        tx.txn_signature = Some("AABB".into());

        let signing = encode_payment(&tx, true).unwrap();
        let full = encode_payment(&tx, false).unwrap();
        // TxnSignature header (0x74) + VL(2) + 2 bytes
        assert_eq!(full.len(), signing.len() + 4);

        let payload = signing_payload(&tx).unwrap();
        assert_eq!(&payload[..4], b"STX\0");
    }

    #[test]
    fn test_encode_requires_autofill() {
        let tx = Payment::new(GENESIS, GATEWAY, XrplAmount::Drops(1));
        assert!(encode_payment(&tx, true).is_err());
    }

    #[test]
    fn test_transaction_hash_format() {
        let hash = transaction_hash(&[0u8; 4]);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
