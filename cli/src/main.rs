//! fxrates CLI
//!
//! Looks up current and historical exchange rates and converts amounts.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxrates_common::{parse_iso_date, today, CurrencyCode, CurrencyPair, Money};
use fxrates_fx::{FxConfig, FxEngine};

mod render;

/// fxrates CLI
#[derive(Parser, Debug)]
#[command(name = "fxrates")]
#[command(about = "Current and historical exchange rates")]
struct Args {
    /// Provider endpoint prefix (overrides FXRATES_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides FXRATES_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available currencies
    Currencies,

    /// Show the current rate between two currencies
    Rate { from: String, to: String },

    /// Convert an amount between two currencies
    Convert { amount: f64, from: String, to: String },

    /// Show the daily rates of the last days
    History {
        from: String,
        to: String,

        /// Number of days, ending today
        #[arg(short, long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=366))]
        days: u32,

        /// Last day of the period (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        end: Option<chrono::NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = FxConfig::from_env();
    if let Some(url) = &args.base_url {
        config.provider.base_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        config.provider.request_timeout = Duration::from_secs(secs);
    }

    init_logging(&config.log_level, args.json_logs);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let engine = FxEngine::from_config(config.provider)?;
    let output = run(&engine, args.command, args.json).await?;
    print!("{}", output);

    debug!(stats = ?engine.stats(), "Done");
    Ok(())
}

fn init_logging(default_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so results can be piped
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(engine: &FxEngine, command: Command, json: bool) -> anyhow::Result<String> {
    let output = match command {
        Command::Currencies => {
            let currencies = engine.currencies().await?;
            if json {
                serde_json::to_string_pretty(&currencies)? + "\n"
            } else {
                render::currencies(&currencies)
            }
        }
        Command::Rate { from, to } => {
            let pair = CurrencyPair::new(from, to);
            let rate = engine.get_rate(&pair.from, &pair.to).await?;
            if json {
                serde_json::json!({ "pair": pair, "rate": rate }).to_string() + "\n"
            } else {
                render::rate(&pair, rate)
            }
        }
        Command::Convert { amount, from, to } => {
            let conversion = engine
                .convert(&Money::new(amount, from), &CurrencyCode::new(to))
                .await?;
            if json {
                serde_json::to_string_pretty(&conversion)? + "\n"
            } else {
                render::conversion(&conversion)
            }
        }
        Command::History {
            from,
            to,
            days,
            end,
        } => {
            let (from, to) = (CurrencyCode::new(from), CurrencyCode::new(to));
            let end = end.unwrap_or_else(today);
            let period = engine.get_period_ending(&from, &to, days, end).await;
            if json {
                serde_json::to_string_pretty(&period.records)? + "\n"
            } else {
                render::period(&period)
            }
        }
    };

    Ok(output)
}
