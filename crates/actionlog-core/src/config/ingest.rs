//! Ingestion worker pool configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the asynchronous ingestion path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Number of concurrent ingestion tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}
