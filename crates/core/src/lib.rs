//! # FxDesk Core
//!
//! Shared building blocks for the THB/USDT/RUB rate desk.
//!
//! ## Contents
//!
//! 1. **Single-threaded async with monoio** - one refresh cycle at a time, timers enabled
//! 2. **Fixed-point arithmetic** - exact decimal quotes, explicit rounding directions
//! 3. **Timestamps** - quote observation times and fetch latency
//! 4. **Unified logging** - tracing, optionally routed to ftlog
//! 5. **Cycle ids** - nanoid-based identifiers for log correlation

pub mod runtime;
pub mod timing;
pub mod fixed;
pub mod logging;
pub mod id_gen;

pub use runtime::{FxDeskRuntime, RuntimeConfig, run_fxdesk};
pub use timing::{nanos, PerfTimer, Timestamp};
pub use fixed::{Fixed, FixedError};
pub use logging::init_logging;
pub use id_gen::{generate_id_with_prefix, CycleId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{FxDeskRuntime, RuntimeConfig, run_fxdesk};
    pub use crate::timing::{nanos, PerfTimer, Timestamp};
    pub use crate::fixed::{Fixed, FixedError};
    pub use crate::id_gen::{generate_id_with_prefix, CycleId};
    pub use crate::logging::init_logging;

    pub use monoio;
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
