use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Datelike, SecondsFormat};
use serde::Serialize;

use super::{
    transaction::{Direction, TransactionRecord},
    units::serialize_plain,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    pub total_items: usize,
    pub incoming_count: usize,
    pub outgoing_count: usize,
    #[serde(serialize_with = "serialize_plain")]
    pub native_eth_in: BigDecimal,
    #[serde(serialize_with = "serialize_plain")]
    pub native_eth_out: BigDecimal,
    pub token_related_transfers: usize,
    pub last_activity_iso: Option<String>,
}

impl TransactionSummary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let (incoming_count, outgoing_count, native_eth_in, native_eth_out, token_related_transfers) =
            records.iter().fold(
                (0, 0, BigDecimal::zero(), BigDecimal::zero(), 0),
                |(mut incoming, mut outgoing, mut eth_in, mut eth_out, mut tokens), record| {
                    match record.direction {
                        Some(Direction::Incoming) => {
                            incoming += 1;
                            if record.is_native() {
                                eth_in += record.amount_or_zero();
                            }
                        }
                        Some(Direction::Outgoing) => {
                            outgoing += 1;
                            if record.is_native() {
                                eth_out += record.amount_or_zero().abs();
                            }
                        }
                        // native amounts without a known direction are left out of both sums
                        _ => {}
                    }

                    if record.is_token_related() {
                        tokens += 1;
                    }

                    (incoming, outgoing, eth_in, eth_out, tokens)
                },
            );

        Self {
            total_items: records.len(),
            incoming_count,
            outgoing_count,
            native_eth_in,
            native_eth_out,
            token_related_transfers,
            last_activity_iso: latest_activity(records).and_then(|(_, ms)| timestamp_ms_to_iso(ms)),
        }
    }
}

/// Summarize an address' transaction history in a single pass.
pub fn summarize(records: &[TransactionRecord]) -> TransactionSummary {
    TransactionSummary::from_records(records)
}

/// Index and value of the most recent valid timestamp.
///
/// On ties the earliest record in input order is kept.
pub fn latest_activity(records: &[TransactionRecord]) -> Option<(usize, i128)> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| record.timestamp_ms.map(|ms| (index, ms)))
        .fold(None, |latest, (index, ms)| match latest {
            Some((_, latest_ms)) if ms <= latest_ms => latest,
            _ => Some((index, ms)),
        })
}

/// Render epoch milliseconds as an ISO-8601 UTC string, e.g.
/// `2023-11-14T22:15:00+00:00` or `2023-11-14T22:15:00.250+00:00`.
///
/// Only years 1 to 9999 have a four digit ISO form, anything else is `None`.
pub fn timestamp_ms_to_iso(ms: i128) -> Option<String> {
    let at = DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)?;
    if !(1..=9999).contains(&at.year()) {
        return None;
    }
    Some(at.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::{json, Value};

    use super::*;
    use crate::domain::transaction::parse_records;

    fn eth(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn summarize_json(values: Value) -> TransactionSummary {
        let values = match values {
            Value::Array(values) => values,
            other => vec![other],
        };
        summarize(&parse_records(&values))
    }

    #[test]
    fn summarizes_mixed_history() {
        let summary = summarize_json(json!([
            {
                "transactionSubtype": "incoming",
                "transactionType": "native",
                "amount": "1.5",
                "timestamp": 1700000000000i64
            },
            {
                "transactionSubtype": "outgoing",
                "transactionType": "native",
                "amount": "-0.5",
                "tokenAddress": "0xabc",
                "timestamp": 1700000100000i64
            }
        ]));

        assert_eq!(
            summary,
            TransactionSummary {
                total_items: 2,
                incoming_count: 1,
                outgoing_count: 1,
                native_eth_in: eth("1.5"),
                native_eth_out: eth("0.5"),
                token_related_transfers: 1,
                last_activity_iso: Some("2023-11-14T22:15:00+00:00".to_string()),
            }
        );
    }

    #[test]
    fn empty_history() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.incoming_count, 0);
        assert_eq!(summary.outgoing_count, 0);
        assert_eq!(summary.native_eth_in, BigDecimal::zero());
        assert_eq!(summary.native_eth_out, BigDecimal::zero());
        assert_eq!(summary.token_related_transfers, 0);
        assert_eq!(summary.last_activity_iso, None);
    }

    #[test]
    fn total_items_counts_every_record() {
        let summary = summarize_json(json!([{}, "garbage", null, { "amount": "x" }]));

        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.incoming_count + summary.outgoing_count, 0);
    }

    #[test]
    fn malformed_amount_contributes_nothing() {
        let summary = summarize_json(json!([
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "not-a-number" },
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "2" },
            { "transactionSubtype": "outgoing", "transactionType": "native" }
        ]));

        assert_eq!(summary.incoming_count, 2);
        assert_eq!(summary.outgoing_count, 1);
        assert_eq!(summary.native_eth_in, eth("2"));
        assert_eq!(summary.native_eth_out, BigDecimal::zero());
    }

    #[test]
    fn outgoing_amounts_are_summed_as_absolute_values() {
        let summary = summarize_json(json!([
            { "transactionSubtype": "outgoing", "transactionType": "native", "amount": "-2.5" },
            { "transactionSubtype": "outgoing", "transactionType": "native", "amount": "1.25" }
        ]));

        assert_eq!(summary.native_eth_out, eth("3.75"));
    }

    #[test]
    fn token_transfers_do_not_touch_native_sums() {
        let summary = summarize_json(json!([
            {
                "transactionSubtype": "incoming",
                "transactionType": "fungible",
                "amount": "500",
                "tokenAddress": "0xdac17f958d2ee523a2206206994597c13d831ec7"
            }
        ]));

        assert_eq!(summary.incoming_count, 1);
        assert_eq!(summary.native_eth_in, BigDecimal::zero());
        assert_eq!(summary.token_related_transfers, 1);
    }

    #[test]
    fn native_record_with_unknown_subtype_is_excluded_from_sums() {
        let summary = summarize_json(json!([
            { "transactionSubtype": "zero-transfer", "transactionType": "native", "amount": "7" },
            { "transactionType": "native", "amount": "3" }
        ]));

        assert_eq!(summary.incoming_count, 0);
        assert_eq!(summary.outgoing_count, 0);
        assert_eq!(summary.native_eth_in, BigDecimal::zero());
        assert_eq!(summary.native_eth_out, BigDecimal::zero());
    }

    #[test]
    fn sums_stay_exact() {
        let summary = summarize_json(json!([
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "0.1" },
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "0.2" },
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "0.000000000000000001" }
        ]));

        assert_eq!(summary.native_eth_in, eth("0.300000000000000001"));
    }

    #[test]
    fn huge_amounts_sum_exactly() {
        let summary = summarize_json(json!([
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "79228162514264337593543950335" },
            { "transactionSubtype": "incoming", "transactionType": "native", "amount": "79228162514264337593543950335.5" },
            { "transactionSubtype": "outgoing", "transactionType": "native", "amount": "-123456789012345678901234567890.5" }
        ]));

        assert_eq!(summary.native_eth_in, eth("158456325028528675187087900670.5"));
        assert_eq!(summary.native_eth_out, eth("123456789012345678901234567890.5"));
    }

    #[test]
    fn latest_activity_is_the_maximum_timestamp() {
        let summary = summarize_json(json!([
            { "timestamp": 100 },
            { "timestamp": 300 },
            { "timestamp": 300 },
            { "timestamp": 200 }
        ]));

        assert_eq!(summary.last_activity_iso.as_deref(), Some("1970-01-01T00:00:00.300+00:00"));
    }

    #[test]
    fn first_record_wins_timestamp_ties() {
        let records = parse_records(&[
            json!({ "hash": "A", "timestamp": 300 }),
            json!({ "hash": "B", "timestamp": 300 }),
        ]);

        let (index, ms) = latest_activity(&records).unwrap();

        assert_eq!(records[index].hash.as_deref(), Some("A"));
        assert_eq!(ms, 300);
    }

    #[test]
    fn records_without_timestamp_are_ignored() {
        let records = parse_records(&[
            json!({ "timestamp": 1700000000000i64 }),
            json!({}),
            json!({ "timestamp": "soon" }),
        ]);

        assert_eq!(latest_activity(&records), Some((0, 1_700_000_000_000)));
        assert_eq!(
            summarize(&records).last_activity_iso.as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
    }

    #[test]
    fn no_valid_timestamp_means_no_activity() {
        let summary = summarize_json(json!([{ "timestamp": null }, { "timestamp": "n/a" }]));

        assert_eq!(summary.last_activity_iso, None);
    }

    #[test]
    fn iso_rendering_keeps_milliseconds() {
        assert_eq!(
            timestamp_ms_to_iso(1_700_000_000_250).as_deref(),
            Some("2023-11-14T22:13:20.250+00:00")
        );
        assert_eq!(timestamp_ms_to_iso(0).as_deref(), Some("1970-01-01T00:00:00+00:00"));
        assert_eq!(timestamp_ms_to_iso(i64::MAX as i128), None);
    }

    #[test]
    fn iso_rendering_is_limited_to_four_digit_years() {
        // 9999-12-31T23:59:59.999Z and one millisecond later
        assert_eq!(
            timestamp_ms_to_iso(253_402_300_799_999).as_deref(),
            Some("9999-12-31T23:59:59.999+00:00")
        );
        assert_eq!(timestamp_ms_to_iso(253_402_300_800_000), None);
        // 0000-12-31T00:00:00Z
        assert_eq!(timestamp_ms_to_iso(-62_135_683_200_000), None);
    }

    #[test]
    fn timestamp_past_the_calendar_still_wins_and_hides_activity() {
        let records = parse_records(&[
            json!({ "timestamp": 1700000000000i64 }),
            json!({ "timestamp": u64::MAX }),
        ]);

        assert_eq!(latest_activity(&records), Some((1, u64::MAX as i128)));
        assert_eq!(summarize(&records).last_activity_iso, None);
    }
}
