//! Unified logging integration
//!
//! `tracing` everywhere; the subscriber is a `FmtSubscriber` filtered by
//! `RUST_LOG`, or ftlog when the `ftlog` feature is enabled.

#[cfg(not(feature = "ftlog"))]
use tracing::Level;
#[cfg(not(feature = "ftlog"))]
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging once, later calls are no-ops
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(feature = "ftlog")]
        {
            init_ftlog();
        }

        #[cfg(not(feature = "ftlog"))]
        {
            init_tracing();
        }
    });
}

#[cfg(feature = "ftlog")]
fn init_ftlog() {
    let built = ftlog::builder()
        .max_log_level(ftlog::LevelFilter::Info)
        .bounded(10_000, false)
        .utc()
        .try_init();

    match built {
        // Logger lives for the whole process
        Ok(guard) => std::mem::forget(guard),
        Err(e) => eprintln!("ftlog init failed: {e}"),
    }
}

#[cfg(not(feature = "ftlog"))]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    // A test harness may already have installed one
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::debug!("📝 Initialized tracing logging");
    }
}

/// Log a fetched quote
#[macro_export]
macro_rules! log_quote {
    ($exchange:expr, $pair:expr, $price:expr) => {
        tracing::info!("💱 QUOTE {} {} = {}", $exchange, $pair, $price);
    };
}

/// Log a settled conversion
#[macro_export]
macro_rules! log_conversion {
    ($direction:expr, $input:expr, $output:expr, $rate:expr) => {
        tracing::info!("🧮 {}: {} -> {} @ {}", $direction, $input, $output, $rate);
    };
}

#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::error!("❌ {} failed: {}", $operation, $error);
    };
}
