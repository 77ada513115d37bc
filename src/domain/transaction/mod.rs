use std::{fmt, str::FromStr};

use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use serde_json::Value;

/// Direction of a transfer relative to the queried address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
    Other(String),
}

impl From<&str> for Direction {
    fn from(subtype: &str) -> Self {
        match subtype {
            "incoming" => Self::Incoming,
            "outgoing" => Self::Outgoing,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => f.write_str("incoming"),
            Self::Outgoing => f.write_str("outgoing"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Native,
    Other(String),
}

impl From<&str> for TransactionKind {
    fn from(kind: &str) -> Self {
        match kind {
            "native" => Self::Native,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// Provider record as it comes off the wire, every field untrusted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRecord {
    transaction_subtype: Option<Value>,
    transaction_type: Option<Value>,
    amount: Option<Value>,
    token_address: Option<Value>,
    timestamp: Option<Value>,
    counter_address: Option<Value>,
    block_number: Option<Value>,
    hash: Option<Value>,
}

/// One entry of an address' transaction history.
///
/// Every field is optional: a value the provider left out or sent in an
/// unexpected shape is `None`, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRecord {
    pub direction: Option<Direction>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<BigDecimal>,
    pub amount_text: Option<String>,
    pub token_address: Option<String>,
    pub timestamp_ms: Option<i128>,
    pub counter_address: Option<String>,
    pub block_number: Option<String>,
    pub hash: Option<String>,
}

impl TransactionRecord {
    /// Normalize a decoded provider document into a record.
    ///
    /// Values that are not JSON objects produce an empty record.
    pub fn from_value(value: &Value) -> Self {
        let raw = match value {
            Value::Object(_) => RawRecord::deserialize(value).unwrap_or_default(),
            _ => RawRecord::default(),
        };

        Self {
            direction: raw
                .transaction_subtype
                .as_ref()
                .and_then(Value::as_str)
                .map(Direction::from),
            kind: raw
                .transaction_type
                .as_ref()
                .and_then(Value::as_str)
                .map(TransactionKind::from),
            amount: raw.amount.as_ref().and_then(parse_amount),
            amount_text: raw.amount.as_ref().and_then(display_text),
            token_address: raw
                .token_address
                .as_ref()
                .filter(|value| is_truthy(value))
                .map(|value| match value {
                    Value::String(address) => address.clone(),
                    other => other.to_string(),
                }),
            timestamp_ms: raw.timestamp.as_ref().and_then(parse_timestamp_ms),
            counter_address: raw.counter_address.as_ref().and_then(display_text),
            block_number: raw.block_number.as_ref().and_then(display_text),
            hash: raw.hash.as_ref().and_then(display_text),
        }
    }

    /// The parsed amount, with malformed or missing amounts counting as zero.
    pub fn amount_or_zero(&self) -> BigDecimal {
        self.amount.clone().unwrap_or_else(BigDecimal::zero)
    }

    pub fn is_native(&self) -> bool {
        self.kind == Some(TransactionKind::Native)
    }

    pub fn is_token_related(&self) -> bool {
        self.token_address.is_some()
    }
}

pub fn parse_records(values: &[Value]) -> Vec<TransactionRecord> {
    values.iter().map(TransactionRecord::from_value).collect()
}

/// Largest exponent, either way, an amount may carry. Adding `1e999999999`
/// to a plain number would expand it to a billion digits.
const MAX_AMOUNT_SCALE: i64 = 1_000;

/// Parse an amount sent either as a JSON string or number.
///
/// Both plain (`"1.5"`) and scientific (`"1e-3"`) notations are accepted.
pub fn parse_amount(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::String(text) => parse_decimal(text.trim()),
        Value::Number(number) => parse_decimal(&number.to_string()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<BigDecimal> {
    if text.is_empty() {
        return None;
    }
    BigDecimal::from_str(text)
        .ok()
        .filter(|amount| amount.as_bigint_and_exponent().1.abs() <= MAX_AMOUNT_SCALE)
}

/// Parse an epoch timestamp in milliseconds.
///
/// Floats are truncated toward zero, strings must hold an integer. Values
/// past any calendar are kept, they still compete for the latest activity.
pub fn parse_timestamp_ms(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|ms| ms.is_finite() && ms.abs() < i128::MAX as f64)
                    .map(|ms| ms.trunc() as i128)
            }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
