use std::fmt;

use bigdecimal::{num_bigint::BigInt, BigDecimal, Num, Signed, Zero};
use serde::Serializer;

use super::error::{Error, Result};

/// Number of fractional digits between wei and ether.
pub const ETH_DECIMALS: i64 = 18;

/// An amount of wei, the smallest unit of ether.
///
/// Unbounded: balances are 256-bit quantities on chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wei(BigInt);

impl Wei {
    /// Parse a JSON-RPC hex quantity such as `0x1bc16d674ec80000`.
    pub fn from_hex_quantity(quantity: &str) -> Result<Self> {
        let invalid = || Error::InvalidHexQuantity {
            quantity: quantity.to_string(),
        };

        let trimmed = quantity.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        BigInt::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn amount(&self) -> &BigInt {
        &self.0
    }
}

impl From<u128> for Wei {
    fn from(amount: u128) -> Self {
        Self(BigInt::from(amount))
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Convert wei into ether using exact decimal arithmetic.
pub fn wei_to_eth(wei: &Wei) -> BigDecimal {
    without_trailing_zeros(BigDecimal::new(wei.0.clone(), ETH_DECIMALS))
}

/// Drop trailing fractional zeros, keeping integers at scale zero.
pub fn without_trailing_zeros(value: BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}

/// Positional notation, never exponential, keeping every fractional digit.
pub fn to_plain_string(value: &BigDecimal) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    let sign = if digits.is_negative() { "-" } else { "" };
    let magnitude = digits.magnitude().to_string();

    if scale <= 0 {
        if digits.is_zero() {
            return "0".to_string();
        }
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{sign}{magnitude}{zeros}");
    }

    let scale = scale as usize;
    let padded = format!("{magnitude:0>width$}", width = scale + 1);
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    format!("{sign}{whole}.{fraction}")
}

/// `serialize_with` helper writing an amount as a plain decimal string.
pub fn serialize_plain<S>(value: &BigDecimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_plain_string(value))
}
