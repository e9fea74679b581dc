//! XRPL currency codes
//!
//! A currency is either a standard 3-character ASCII code (`USD`, `EUR`) or a
//! 160-bit code rendered as 40 hex characters whose first byte is not `0x00`.
//! Longer human-readable names are carried as the hex of their bytes,
//! right-padded with zeros.

use crate::address_codec::string_to_hex;
use crate::error::BridgeError;

/// Hex length of a 160-bit currency code
pub const NON_STANDARD_CODE_LEN: usize = 40;

const STANDARD_CODE_SYMBOLS: &[u8] = b"?!@#$%^&*<>(){}[]|";

/// Exactly 3 ASCII letters, digits or one of `?!@#$%^&*<>(){}[]|`
pub fn is_standard_currency_code(code: &str) -> bool {
    code.len() == 3
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || STANDARD_CODE_SYMBOLS.contains(&b))
}

/// 40 hex characters not starting with `00`
pub fn is_non_standard_currency_code(code: &str) -> bool {
    code.len() == NON_STANDARD_CODE_LEN
        && code.bytes().all(|b| b.is_ascii_hexdigit())
        && !code.starts_with("00")
}

/// Convert a currency name into the form XRPL accepts.
///
/// Standard and already-normalized codes are returned unchanged, so the
/// function is idempotent.
pub fn normalize_currency_code(code: &str) -> Result<String, BridgeError> {
    if is_standard_currency_code(code) || is_non_standard_currency_code(code) {
        return Ok(code.to_string());
    }

    let encoded = string_to_hex(code);
    if encoded.len() > NON_STANDARD_CODE_LEN {
        return Err(invalid(
            code,
            format!(
                "encodes to {} hex characters, over the {} character limit",
                encoded.len(),
                NON_STANDARD_CODE_LEN
            ),
        ));
    }
    if code.starts_with("00") {
        return Err(invalid(code, "non standard codes cannot start with 00"));
    }

    Ok(format!("{:0<width$}", encoded, width = NON_STANDARD_CODE_LEN))
}

/// Inverse of [`normalize_currency_code`]: decode a hex code back to its name.
pub fn parse_currency_code(code: &str) -> Result<String, BridgeError> {
    if is_standard_currency_code(code) {
        return Ok(code.to_string());
    }
    if code.len() < NON_STANDARD_CODE_LEN {
        return Err(invalid(
            code,
            format!(
                "has {} characters instead of {}",
                code.len(),
                NON_STANDARD_CODE_LEN
            ),
        ));
    }
    if code.starts_with("00") {
        return Err(invalid(code, "non standard codes cannot start with 00"));
    }

    let bytes = hex::decode(code).map_err(|e| invalid(code, e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| invalid(code, e.to_string()))?;
    Ok(text.replace('\0', ""))
}

/// The 20-byte binary form of a normalized currency code
pub fn currency_code_bytes(code: &str) -> Result<[u8; 20], BridgeError> {
    let mut out = [0u8; 20];
    if is_standard_currency_code(code) {
        if code == "XRP" {
            return Err(invalid(code, "XRP is not an issued currency"));
        }
        out[12..15].copy_from_slice(code.as_bytes());
        return Ok(out);
    }
    if !is_non_standard_currency_code(code) {
        return Err(invalid(code, "not a normalized currency code"));
    }
    let bytes = hex::decode(code).map_err(|e| invalid(code, e.to_string()))?;
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn invalid(code: &str, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidCurrencyCode {
        code: code.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_codes_pass_through() {
        assert_eq!(normalize_currency_code("USD").unwrap(), "USD");
        assert_eq!(normalize_currency_code("a?|").unwrap(), "a?|");
        assert!(!is_standard_currency_code("US"));
        assert!(!is_standard_currency_code("US~"));
    }

    #[test]
    fn test_long_names_are_hex_padded() {
        let code = normalize_currency_code("FOOBAR").unwrap();
        assert_eq!(code, "464F4F4241520000000000000000000000000000");
        assert_eq!(code.len(), NON_STANDARD_CODE_LEN);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["USD", "FOOBAR", "RLUSD", "0123456789"] {
            let once = normalize_currency_code(name).unwrap();
            let twice = normalize_currency_code(&once).unwrap();
            assert_eq!(once, twice, "{}", name);
        }
    }

    #[test]
    fn test_normalize_then_parse_roundtrip() {
        for name in ["USD", "FOOBAR", "RLUSD", "twentycharacterslong"] {
            let code = normalize_currency_code(name).unwrap();
            assert_eq!(parse_currency_code(&code).unwrap(), name);
        }
    }

    #[test]
    fn test_normalize_rejects_oversized_and_zero_prefixed() {
        let err = normalize_currency_code("twentyonecharacterss!").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCurrencyCode { .. }));

        assert!(normalize_currency_code("00abc").is_err());
    }

    #[test]
    fn test_parse_rejects_short_codes() {
        assert!(parse_currency_code("ABCD").is_err());
        assert!(parse_currency_code(&format!("00{}", "1".repeat(38))).is_err());
    }

    #[test]
    fn test_currency_code_bytes() {
        let usd = currency_code_bytes("USD").unwrap();
        assert_eq!(&usd[12..15], b"USD");
        assert!(usd[..12].iter().all(|b| *b == 0));

        let hex_code = normalize_currency_code("FOOBAR").unwrap();
        let raw = currency_code_bytes(&hex_code).unwrap();
        assert_eq!(&raw[..6], b"FOOBAR");

        assert!(currency_code_bytes("XRP").is_err());
        assert!(currency_code_bytes("FOOBAR").is_err());
    }
}
