use std::{io::stdout, process::ExitCode};

use clap::{Parser, ValueEnum};
use ethmon::{
    client::{TatumClient, DEFAULT_CHAIN, DEFAULT_PAGE_SIZE},
    config::Config,
    domain::address::Address,
    error::Result,
    monitor,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

/// Ethereum address monitor using Tatum APIs
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Ethereum address to monitor (0x...)
    #[arg(long)]
    address: String,
    /// Number of recent items to fetch
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
    /// Chain to read the transaction history from
    #[arg(long, default_value = DEFAULT_CHAIN)]
    chain: String,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

async fn run(args: &Args) -> Result<()> {
    let address = Address::parse(&args.address)?;
    let config = Config::from_env()?;
    let client = TatumClient::new(&config)?;

    let report = monitor(&client, &address, args.limit, &args.chain).await?;

    match args.format {
        Format::Text => report.write_text(args.limit as usize, stdout().lock())?,
        Format::Json => {
            report.write_json(stdout().lock())?;
            println!();
        }
        Format::Csv => ethmon::csv::write([&report], stdout().lock())?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    // a missing .env file is fine, the variables may come from the environment
    if let Err(e) = dotenv {
        if !e.not_found() {
            log::warn!("could not load .env: {e}");
        }
    }

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("\nError while running monitor:");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
