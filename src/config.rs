//! Cache configuration.
//!
//! Managers are usually built with defaults; games that keep their engine
//! settings in JSON can embed a `CacheConfig` there and parse it with
//! `from_json_str`.

use serde::{Deserialize, Serialize};

/// What happens to a recycled slot id when constructing the resource that
/// was meant to occupy it fails.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedSlotPolicy {
    /// Push the id back on the free list so the next load reuses it.
    #[default]
    Reclaim,
    /// Leave the id off both the arena and the free list. It is never handed
    /// out again. Matches older callers that observed this leak.
    Strand,
}

/// Settings for a `ResourceManager`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of slots (and dedup entries) reserved up front.
    #[serde(default)]
    pub initial_capacity: usize,
    /// Handling of recycled ids after a failed construction.
    #[serde(default)]
    pub failed_slot_policy: FailedSlotPolicy,
}

impl CacheConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
