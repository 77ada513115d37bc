pub mod client;
pub mod config;
pub mod csv;
pub mod domain;
pub mod error;
pub mod report;

use log::{debug, info};

use crate::{
    client::TatumClient,
    domain::{
        address::Address,
        summary::summarize,
        transaction::parse_records,
        units::wei_to_eth,
    },
    error::Result,
    report::Report,
};

/// Fetch the balance and one page of history of `address`, then summarize it.
pub async fn monitor(
    client: &TatumClient,
    address: &Address,
    page_size: u32,
    chain: &str,
) -> Result<Report> {
    let balance = client.balance(address).await?;
    debug!("balance of {address}: {balance}");

    let history = client.transaction_history(address, page_size, chain).await?;
    let records = parse_records(&history);

    let malformed = records
        .iter()
        .filter(|record| record.amount.is_none() && record.amount_text.is_some())
        .count();
    if malformed > 0 {
        debug!("{malformed} history items carry a non-numeric amount, counted as zero");
    }

    let summary = summarize(&records);
    info!(
        "summarized {} history items of {address} ({} incoming, {} outgoing)",
        summary.total_items, summary.incoming_count, summary.outgoing_count
    );

    Ok(Report {
        address: address.clone(),
        balance_eth: wei_to_eth(&balance),
        summary,
        records,
    })
}
