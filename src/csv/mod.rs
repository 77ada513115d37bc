use std::io::Write;

use csv::{Result, Writer};
use serde::Serialize;

use crate::{domain::units::to_plain_string, report::Report};

/// Flat view of a [`Report`], one CSV row per monitored address.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    address: &'a str,
    balance_eth: String,
    total_items: usize,
    incoming_count: usize,
    outgoing_count: usize,
    native_eth_in: String,
    native_eth_out: String,
    token_related_transfers: usize,
    last_activity_iso: Option<&'a str>,
}

impl<'a> From<&'a Report> for SummaryRow<'a> {
    fn from(report: &'a Report) -> Self {
        let summary = &report.summary;
        Self {
            address: report.address.as_str(),
            balance_eth: to_plain_string(&report.balance_eth),
            total_items: summary.total_items,
            incoming_count: summary.incoming_count,
            outgoing_count: summary.outgoing_count,
            native_eth_in: to_plain_string(&summary.native_eth_in),
            native_eth_out: to_plain_string(&summary.native_eth_out),
            token_related_transfers: summary.token_related_transfers,
            last_activity_iso: summary.last_activity_iso.as_deref(),
        }
    }
}

/// Write the summaries of `reports` as CSV, with a header row.
pub fn write<'a>(reports: impl IntoIterator<Item = &'a Report>, writer: impl Write) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    for report in reports {
        writer.serialize(SummaryRow::from(report))?;
    }

    writer.flush()?;
    Ok(())
}
