//! Single-threaded monoio runtime for refresh cycles
//!
//! A refresh cycle is two sequential HTTP fetches followed by pure
//! computation, so one thread is plenty. The timer driver is always enabled
//! because every outbound request carries a timeout.

use monoio::{FusionDriver, RuntimeBuilder};
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub thread_name: String,
    /// io_uring submission queue entries, the legacy driver ignores it
    pub entries: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_name: "fxdesk-main".to_string(),
            entries: None,
        }
    }
}

/// FxDesk runtime: a fusion (io_uring with epoll fallback) driver with timers
pub struct FxDeskRuntime {
    config: RuntimeConfig,
}

impl FxDeskRuntime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        info!("🚀 FxDesk runtime initialized ({})", config.thread_name);
        Self { config }
    }

    /// Run a future to completion on a fresh runtime
    pub fn block_on<F>(&self, future: F) -> std::io::Result<F::Output>
    where
        F: std::future::Future,
    {
        let mut builder = RuntimeBuilder::<FusionDriver>::new().enable_timer();
        if let Some(entries) = self.config.entries {
            builder = builder.with_entries(entries);
        }
        let mut runtime = builder.build()?;
        Ok(runtime.block_on(future))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Default for FxDeskRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to create a runtime and run one future on it
pub fn run_fxdesk<F, Fut>(f: F) -> std::io::Result<Fut::Output>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    FxDeskRuntime::new().block_on(f())
}
