//! Exact decimal amount scaling
//!
//! Amounts enter the API as human decimal strings (`"10.5"`). They are scaled
//! to smallest units without any floating point: an amount with more
//! fractional digits than the token supports is rejected instead of rounded.

use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

use crate::error::BridgeError;

/// Fractional digits of XRP (1 XRP = 1_000_000 drops)
pub const XRP_DECIMALS: u8 = 6;

/// Upper bound on XRP supply in drops (10^17)
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Parse a non-negative decimal string.
pub fn parse_decimal(amount: &str) -> Result<BigDecimal, BridgeError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(BridgeError::invalid_amount(amount, "empty amount"));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| BridgeError::invalid_amount(amount, e.to_string()))?;
    if value < BigDecimal::from(0) {
        return Err(BridgeError::invalid_amount(amount, "amount is negative"));
    }
    Ok(value.normalized())
}

/// Scale `amount` by `10^decimals` into an integer number of smallest units.
pub fn scale_amount(amount: &str, decimals: u8) -> Result<U256, BridgeError> {
    let value = parse_decimal(amount)?;
    let (digits, exponent) = value.as_bigint_and_exponent();

    if exponent > i64::from(decimals) {
        return Err(BridgeError::invalid_amount(
            amount,
            format!(
                "{} fractional digits exceed the token's {} decimals",
                exponent, decimals
            ),
        ));
    }

    let shift = i64::from(decimals)
        .checked_sub(exponent)
        .ok_or_else(|| BridgeError::invalid_amount(amount, "exponent out of range"))?;
    // 10^78 alone exceeds U256::MAX
    if shift > 78 && digits != BigInt::from(0) {
        return Err(BridgeError::invalid_amount(amount, "amount overflows uint256"));
    }
    let shift = u32::try_from(shift)
        .map_err(|_| BridgeError::invalid_amount(amount, "exponent out of range"))?;

    let scaled = digits * BigInt::from(10u8).pow(shift);
    U256::from_str_radix(&scaled.to_string(), 10)
        .map_err(|_| BridgeError::invalid_amount(amount, "amount overflows uint256"))
}

/// Convert an XRP amount into drops.
pub fn xrp_to_drops(amount: &str) -> Result<u64, BridgeError> {
    let drops = scale_amount(amount, XRP_DECIMALS)?;
    let drops: u64 = drops
        .try_into()
        .map_err(|_| BridgeError::invalid_amount(amount, "amount exceeds XRP supply"))?;
    if drops > MAX_DROPS {
        return Err(BridgeError::invalid_amount(amount, "amount exceeds XRP supply"));
    }
    Ok(drops)
}
