use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    contract_details, load_settings, AlertSink, PriceConsumerContract, PriceDisplayController,
    Settings,
};
use shared::domain::format_scaled;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Read and refresh the price stored in the price consumer contract")]
struct Args {
    /// JSON-RPC url of the wallet provider.
    #[arg(long, global = true)]
    provider_url: Option<String>,
    #[arg(long, global = true)]
    contract: Option<String>,
    /// Account to send the refresh transaction from.
    #[arg(long, global = true)]
    from: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the stored price.
    Read,
    /// Ask the contract to store the latest feed price, then print the stored price.
    Update,
    /// Print every read accessor of the contract.
    Info,
}

struct StderrAlert;

impl AlertSink for StderrAlert {
    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn apply_overrides(mut settings: Settings, args: &Args) -> Settings {
    if let Some(v) = &args.provider_url {
        settings.provider_url = v.clone();
    }
    if let Some(v) = &args.contract {
        settings.contract_address = v.clone();
    }
    if let Some(v) = &args.from {
        settings.from_address = Some(v.clone());
    }
    settings
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = apply_overrides(load_settings(), &args).resolve()?;
    tracing::info!(
        provider = %config.provider_url,
        contract = %config.contract_address,
        "bound price consumer contract"
    );
    let contract = PriceConsumerContract::from_config(&config);
    let mut controller = PriceDisplayController::new(contract, StderrAlert);

    match args.command {
        Command::Read => {
            let Some(price) = controller.fetch_stored_value().await else {
                eprintln!("could not read the stored price; see log output");
                return Ok(ExitCode::FAILURE);
            };
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "raw": price.raw.to_string(), "price": price.to_string() })
                );
            } else {
                println!("{}", controller.display().render_label(&config.pair_label));
            }
        }
        Command::Update => {
            let Some(outcome) = controller.request_update().await else {
                return Ok(ExitCode::FAILURE);
            };
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tx_hash": outcome.tx_hash,
                        "price": outcome.refreshed.map(|p| p.to_string()),
                    })
                );
            } else {
                println!("Transaction confirmed: {}", outcome.tx_hash);
                println!("{}", controller.display().render_label(&config.pair_label));
            }
        }
        Command::Info => {
            let details = contract_details(controller.endpoint()).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("Contract:       {}", config.contract_address);
                println!("Price feed:     {}", details.price_feed);
                println!("Feed decimals:  {}", details.decimals);
                println!("Latest price:   {}", scale_feed_price(details.latest_price, details.decimals));
                println!("Stored price:   {}", details.stored_price);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Renders a raw feed answer using the decimals the feed reports.
fn scale_feed_price(raw: i128, decimals: u8) -> String {
    format_scaled(raw, u32::from(decimals))
}
