use std::io::Write;

use bigdecimal::{BigDecimal, RoundingMode};
use serde::Serialize;

use crate::domain::{
    address::Address,
    summary::TransactionSummary,
    transaction::TransactionRecord,
    units::{serialize_plain, to_plain_string},
};

const NOT_AVAILABLE: &str = "n/a";

/// Everything the monitor learned about one address.
#[derive(Debug, Serialize)]
pub struct Report {
    pub address: Address,
    #[serde(serialize_with = "serialize_plain")]
    pub balance_eth: BigDecimal,
    pub summary: TransactionSummary,
    #[serde(skip)]
    pub records: Vec<TransactionRecord>,
}

impl Report {
    /// Human readable report followed by at most `limit` recent records.
    pub fn write_text(&self, limit: usize, mut writer: impl Write) -> std::io::Result<()> {
        let summary = &self.summary;

        writeln!(writer)?;
        writeln!(writer, "Address: {}", self.address)?;
        writeln!(writer, "ETH balance (RPC): {} ETH", fixed(&self.balance_eth, 6))?;
        writeln!(writer, "Items fetched: {}", summary.total_items)?;
        writeln!(
            writer,
            "Incoming: {} | Outgoing: {}",
            summary.incoming_count, summary.outgoing_count
        )?;
        writeln!(
            writer,
            "Native ETH in: {} ETH | Native ETH out: {} ETH",
            fixed(&summary.native_eth_in, 9),
            fixed(&summary.native_eth_out, 9)
        )?;
        writeln!(writer, "Token-related transfers: {}", summary.token_related_transfers)?;
        writeln!(
            writer,
            "Last activity (UTC): {}",
            summary.last_activity_iso.as_deref().unwrap_or(NOT_AVAILABLE)
        )?;

        writeln!(writer)?;
        writeln!(writer, "Recent activity (Tatum history):")?;
        writeln!(
            writer,
            "subtype   | type     | amount          | counter         | block      | hash"
        )?;
        writeln!(writer, "{}", "-".repeat(96))?;

        for record in self.records.iter().take(limit) {
            writeln!(writer, "{}", activity_row(record))?;
        }

        writer.flush()
    }

    pub fn write_json(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

fn activity_row(record: &TransactionRecord) -> String {
    let subtype = record
        .direction
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string);
    let kind = record
        .kind
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string);
    let amount = record.amount_text.as_deref().unwrap_or("0");
    let counter = shorten_address(record.counter_address.as_deref().unwrap_or_default());
    let block = record.block_number.as_deref().unwrap_or(NOT_AVAILABLE);
    let hash = shorten_hash(record.hash.as_deref().unwrap_or_default());

    format!("{subtype:<8} | {kind:<8} | {amount:>14} | {counter:<14} | {block:>9} | {hash}")
}

/// Round half to even, then pad to exactly `dp` fractional digits.
pub fn fixed(value: &BigDecimal, dp: u32) -> String {
    to_plain_string(&value.with_scale_round(i64::from(dp), RoundingMode::HalfEven))
}

/// `0x5c504ed432…b22060` for anything longer than 20 characters.
pub fn shorten_hash(hash: &str) -> String {
    shorten(hash, 20, 10, 6)
}

/// `0x28c6…1d60` for anything longer than 14 characters.
pub fn shorten_address(address: &str) -> String {
    shorten(address, 14, 6, 4)
}

fn shorten(text: &str, max: usize, head: usize, tail: usize) -> String {
    if text.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }

    let head: String = chars[..head].iter().collect();
    let tail: String = chars[chars.len() - tail..].iter().collect();
    format!("{head}…{tail}")
}
