//! Tiered flush scheduling: three independent fixed-delay loops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use actionlog_core::config::flush::FlushConfig;
use actionlog_entity::action::OperationKind;

use crate::flush::FlushPipeline;

/// Runs the three flush tiers for the lifetime of the process.
///
/// Each tier is its own task with its own fixed delay, measured from the
/// end of the previous run, so a slow run pushes the next one back
/// instead of overlapping it. The tiers operate on disjoint kind sets —
/// the forced tier drains whatever is left, which is always safe — so
/// correctness does not depend on their relative firing order.
#[derive(Debug)]
pub struct FlushScheduler {
    pipeline: Arc<FlushPipeline>,
    config: FlushConfig,
}

impl FlushScheduler {
    /// Create a new scheduler over the shared pipeline.
    pub fn new(pipeline: Arc<FlushPipeline>, config: FlushConfig) -> Self {
        Self { pipeline, config }
    }

    /// Spawn all three tier loops.
    ///
    /// The loops run until `true` is observed on the cancel channel; the
    /// returned handles let the caller await their termination during
    /// graceful shutdown.
    pub fn spawn(&self, cancel: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        info!(
            read_interval_seconds = self.config.read_interval_seconds,
            read_threshold = self.config.read_threshold,
            other_interval_seconds = self.config.other_interval_seconds,
            other_threshold = self.config.other_threshold,
            forced_interval_seconds = self.config.forced_interval_seconds,
            "Starting flush scheduler tiers"
        );

        let read_tier = {
            let pipeline = Arc::clone(&self.pipeline);
            let threshold = self.config.read_threshold;
            run_tier(
                "read",
                Duration::from_secs(self.config.read_interval_seconds),
                cancel.clone(),
                move || {
                    let pipeline = Arc::clone(&pipeline);
                    async move { pipeline.flush_kind(OperationKind::Read, threshold).await }
                },
            )
        };

        let other_tier = {
            let pipeline = Arc::clone(&self.pipeline);
            let threshold = self.config.other_threshold;
            run_tier(
                "other",
                Duration::from_secs(self.config.other_interval_seconds),
                cancel.clone(),
                move || {
                    let pipeline = Arc::clone(&pipeline);
                    async move {
                        pipeline
                            .flush_kinds(&OperationKind::NON_READ, threshold)
                            .await
                    }
                },
            )
        };

        let forced_tier = {
            let pipeline = Arc::clone(&self.pipeline);
            run_tier(
                "forced",
                Duration::from_secs(self.config.forced_interval_seconds),
                cancel,
                move || {
                    let pipeline = Arc::clone(&pipeline);
                    async move { pipeline.flush_all().await }
                },
            )
        };

        vec![read_tier, other_tier, forced_tier]
    }
}

/// Spawn one tier loop: sleep the fixed delay, run, repeat until cancelled.
fn run_tier<F, Fut>(
    name: &'static str,
    period: Duration,
    mut cancel: watch::Receiver<bool>,
    run: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = u64> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    // A dropped sender counts as shutdown too.
                    if changed.is_err() || *cancel.borrow() {
                        info!(tier = name, "Flush tier received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(period) => {
                    let written = run().await;
                    if written > 0 {
                        debug!(tier = name, rows = written, "Flush tier run complete");
                    }
                }
            }
        }
    })
}
