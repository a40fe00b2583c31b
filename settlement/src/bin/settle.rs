//! Settlement plan CLI
//!
//! Usage: `splitify-settle <ledger.json> [config.toml]`
//!
//! Reads an event's records as JSON and prints the settlement report.

use anyhow::Context;
use splitify_settlement::{config::LoggingConfig, Config, SettlementEngine};
use splitify_ledger::LedgerInput;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries the report
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let ledger_path = args
        .next()
        .context("usage: splitify-settle <ledger.json> [config.toml]")?;

    let config = match args.next() {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::default(),
    }
    .with_env_overrides()?;

    init_tracing(&config.logging);
    tracing::info!("Starting {} {}", config.service_name, config.service_version);

    let raw = std::fs::read_to_string(&ledger_path)
        .with_context(|| format!("reading {}", ledger_path))?;
    let input: LedgerInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", ledger_path))?;

    let engine = SettlementEngine::new(config)?;
    let report = engine.settle(&input)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
