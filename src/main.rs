// src/main.rs
use crate::config::AppConfig;
use crate::connectors::binance::BinanceClient;
use crate::core::confirm::StdinConfirm;
use crate::core::engine::{RunMode, TradeOrchestrator};
use crate::notify::{Notifier, WebhookNotifier};
use crate::types::{RunOutcome, Side, TradeRequest};
use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::process::ExitCode;
use tracing::{error, info};

mod config;
mod connectors;
mod core;
mod error;
mod logging;
mod notify;
mod strategies;
mod types;
mod utils;

/// Binance DCA buying/selling bot.
///
///   ETHBTC SELL 0.00125 BTC    (sell 0.00125 BTC worth of ETH)
///   ETHBTC SELL 0.1 ETH        (sell 0.1 ETH)
#[derive(Parser, Debug)]
#[command(name = "dca-bot", version, verbatim_doc_comment)]
struct Cli {
    /// Market symbol (e.g. BTCUSDT, ETH-BTC)
    market_name: String,

    /// BUY or SELL
    order_side: Side,

    /// The quantity to buy or sell in the amount_currency
    #[arg(value_parser = parse_amount)]
    amount: Decimal,

    /// The currency the amount is denominated in
    amount_currency: String,

    /// Override default settings config file location
    #[arg(short = 'c', long = "settings-config", default_value = "settings.conf")]
    settings_config: String,

    /// Scale the trade amount up or down depending on 24hr price change
    #[arg(short, long)]
    dynamic_dca: bool,

    /// Submit live orders. When omitted, just tests API connection
    /// and amount without submitting actual orders
    #[arg(short, long)]
    live: bool,

    /// Suppress the confirmation step before submitting actual orders
    #[arg(short, long)]
    job: bool,
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    let amount: Decimal = s.parse().map_err(|e| format!("invalid decimal '{}': {}", s, e))?;
    if amount <= Decimal::ZERO {
        return Err(format!("amount must be positive, got {}", amount));
    }
    Ok(amount)
}

/// Binance symbols have no separator: ETH-BTC and eth/btc both mean ETHBTC.
fn normalize_symbol(market: &str) -> String {
    market.replace(['-', '/', '_'], "").to_ascii_uppercase()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 1. Load Configuration
    let config = AppConfig::load(&cli.settings_config)
        .with_context(|| format!("loading settings from {}", cli.settings_config))?;
    let _log_guard = logging::init(&config.logging)?;

    info!("STARTED: {:?}", cli);

    if !cli.live {
        println!();
        println!("\t================= NOT in Live mode =================");
        println!("\t*                                                  *");
        println!("\t*        No actual trades being submitted!         *");
        println!("\t*                                                  *");
        println!("\t====================================================");
        println!();
    }

    // 2. Initialize Components
    let exchange = BinanceClient::new(&config.api).context("building Binance client")?;
    let notifier: Option<Box<dyn Notifier>> = match &config.notify {
        Some(notify) => Some(Box::new(WebhookNotifier::new(notify)?)),
        None => None,
    };
    let orchestrator = TradeOrchestrator::new(
        Box::new(exchange),
        notifier,
        Box::new(StdinConfirm),
        config.dynamic_dca.policy(),
        RunMode {
            live: cli.live,
            unattended: cli.job,
        },
    );

    let request = TradeRequest {
        market_name: normalize_symbol(&cli.market_name),
        side: cli.order_side,
        amount: cli.amount,
        amount_currency: cli.amount_currency.clone(),
        dynamic_dca: cli.dynamic_dca,
    };

    // 3. Run
    match orchestrator.run(&request).await? {
        RunOutcome::Simulated { summary, .. } => {
            println!("\n================================================");
            println!("{}", summary);
            println!("(NOT in live mode - no actual orders placed!)");
        }
        RunOutcome::Filled { summary, .. } => {
            println!("\n================================================");
            println!("{}", summary);
        }
        RunOutcome::Rejected {
            message, summary, ..
        } => {
            println!("Order not submitted: {}", message);
            if let Some(summary) = summary {
                println!("{}", summary);
            }
        }
        RunOutcome::Declined => {
            println!("Exiting without submitting orders.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_positional_arguments_and_flags() {
        let cli = Cli::try_parse_from(["dca-bot", "ETH-BTC", "sell", "0.00125", "BTC", "-d", "-l", "-j"])
            .unwrap();
        assert_eq!(cli.order_side, Side::Sell);
        assert_eq!(cli.amount, dec!(0.00125));
        assert!(cli.dynamic_dca && cli.live && cli.job);
        assert_eq!(cli.settings_config, "settings.conf");
        assert_eq!(normalize_symbol(&cli.market_name), "ETHBTC");
    }

    #[test]
    fn simulation_is_the_default() {
        let cli = Cli::try_parse_from(["dca-bot", "ETHBTC", "BUY", "0.1", "ETH", "-c", "alt.conf"]).unwrap();
        assert!(!cli.live);
        assert!(!cli.job);
        assert_eq!(cli.settings_config, "alt.conf");
    }

    #[test]
    fn rejects_bad_side_and_non_positive_amounts() {
        assert!(Cli::try_parse_from(["dca-bot", "ETHBTC", "HOLD", "0.1", "ETH"]).is_err());
        assert!(Cli::try_parse_from(["dca-bot", "ETHBTC", "BUY", "0", "ETH"]).is_err());
        assert!(Cli::try_parse_from(["dca-bot", "ETHBTC", "BUY", "abc", "ETH"]).is_err());
    }
}
