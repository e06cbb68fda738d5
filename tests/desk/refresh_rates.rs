//! Run one refresh cycle against the live exchanges
//!
//! 1. Loads configuration from the environment and `.env`
//! 2. Fetches Bitkub THB/USDT and Rapira USDT/RUB
//! 3. Prints the computed-rates export
//! 4. Prints the default sample conversions

use anyhow::Context;
use fxdesk_core::prelude::*;
use fxdesk_rates::prelude::*;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    info!("🚀 FxDesk rate refresh");
    run_fxdesk(run).context("starting runtime")?
}

async fn run() -> anyhow::Result<()> {
    let config = DeskConfig::load().context("loading desk configuration")?;
    let desk = RateDesk::from_config(&config).context("building rate desk")?;

    let snapshot = desk.refresh().await.context("refresh cycle failed")?;
    info!("📊 Primary: {} ({:?})", snapshot.primary, snapshot.primary.mode);
    info!("📊 Secondary: {}", snapshot.secondary);

    let export = desk.export(&snapshot)?;
    println!("{}", export.to_json_pretty()?);

    let margins = desk.margins();
    let samples = [
        ConversionQuery::new(Direction::UsdtToThb, Fixed::from_i64(1_000), margins.usdt_margin),
        ConversionQuery::new(Direction::ThbToUsdt, Fixed::from_i64(30_000), margins.usdt_margin),
        ConversionQuery::new(Direction::RubToThb, Fixed::from_i64(100_000), margins.rub_margin),
        ConversionQuery::new(Direction::ThbToRub, Fixed::from_i64(30_000), margins.rub_margin),
    ];

    println!();
    for query in &samples {
        match desk.convert(&snapshot, query) {
            Ok(result) => println!("💱 {result} (margin {}%)", result.margin_percent),
            // a refused query leaves the rest of the snapshot usable
            Err(e) if !e.is_cycle_fatal() => println!("⚠️  {} {} refused: {e}", query.amount, query.direction),
            Err(e) => return Err(e.into()),
        }
    }

    info!("✅ Cycle {} complete", snapshot.cycle_id);
    Ok(())
}
