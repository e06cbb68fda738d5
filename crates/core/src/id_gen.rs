//! Identifiers for refresh cycles
//!
//! Every refresh cycle gets an id that is stamped on its log lines and on the
//! snapshot it publishes, so a reported rate can be traced back to the two
//! fetches that produced it.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide cycle counter
static CYCLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Alphanumeric alphabet, keeps ids splittable on '-'
const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Refresh cycle identifier: `CYC-<seq>-<millis>-<nanoid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(String);

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleId {
    pub fn new() -> Self {
        let seq = next_sequence();
        Self(generate_id_with_prefix(&format!("CYC-{seq}")))
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sequence number within this process, if the id was generated here
    pub fn sequence(&self) -> Option<u64> {
        self.0.split('-').nth(1)?.parse().ok()
    }
}

impl Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<prefix>-<unix millis>-<8 char nanoid>`
pub fn generate_id_with_prefix(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let short_id = nanoid!(8, &ID_ALPHABET);
    format!("{prefix}-{timestamp}-{short_id}")
}

fn next_sequence() -> u64 {
    CYCLE_COUNTER.fetch_add(1, Ordering::SeqCst)
}
