#![allow(clippy::print_stdout)]

pub mod args;
pub mod handlers;

use crate::args::{Cli, Command};
use crate::handlers::Pickup;
use anyhow::{Context, Result};
use clap::Parser;
use phub::booking::InMemoryBookingRepository;
use phub::domain::config::EngineConfig;
use phub::kernel::config::load_config;
use phub::serviceability::InMemoryCatalog;
use phub::{Engine, InMemoryEngine};
use phub_logger::Logger;
use serde::Serialize;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: EngineConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    let catalog = InMemoryCatalog::from_json_file(&cli.catalog)
        .with_context(|| format!("Failed to load catalog {}", cli.catalog.display()))?;
    let engine: InMemoryEngine = Engine::init(cfg, catalog, InMemoryBookingRepository::new())?;
    tracing::debug!(catalog = %cli.catalog.display(), "Engine ready");

    match cli.command {
        Command::Check { postal_code } => print(&handlers::check(&engine, &postal_code)?),
        Command::Estimate { route, tier } => {
            print(&handlers::estimate(&engine, &route, tier.as_deref())?)
        },
        Command::Quote { route, parcel } => print(&handlers::quote(&engine, &route, &parcel)?),
        Command::Book { route, parcel, parties, pickup_date, pickup_slot, notes, coupon } => {
            let pickup = Pickup { date: pickup_date, slot: pickup_slot, notes, coupon };
            print(&handlers::book(&engine, &route, &parcel, parties, pickup).await?)
        },
    }
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
