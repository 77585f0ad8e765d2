//! Flush tier scheduling configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the three flush tiers.
///
/// Each interval is a fixed delay measured from the end of the previous
/// run of that tier, so overlapping runs of the same tier cannot occur.
/// Thresholds bound how many records a single batch row may carry, which
/// keeps the serialized payload within the column cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushConfig {
    /// Delay between read-tier runs, in seconds.
    #[serde(default = "default_read_interval")]
    pub read_interval_seconds: u64,
    /// Minimum backlog before a read-kind group is drained.
    #[serde(default = "default_read_threshold")]
    pub read_threshold: usize,
    /// Delay between other-tier runs, in seconds.
    #[serde(default = "default_other_interval")]
    pub other_interval_seconds: u64,
    /// Minimum backlog before a non-read group is drained.
    #[serde(default = "default_other_threshold")]
    pub other_threshold: usize,
    /// Delay between forced full flushes, in seconds. Bounds how long any
    /// record can stay buffered under sustained low traffic.
    #[serde(default = "default_forced_interval")]
    pub forced_interval_seconds: u64,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            read_interval_seconds: default_read_interval(),
            read_threshold: default_read_threshold(),
            other_interval_seconds: default_other_interval(),
            other_threshold: default_other_threshold(),
            forced_interval_seconds: default_forced_interval(),
        }
    }
}

fn default_read_interval() -> u64 {
    5 * 60
}

fn default_read_threshold() -> usize {
    100
}

fn default_other_interval() -> u64 {
    10 * 60
}

fn default_other_threshold() -> usize {
    10
}

fn default_forced_interval() -> u64 {
    30 * 60
}
