//! Asynchronous ingestion service with a bounded worker pool.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use actionlog_core::config::ingest::IngestConfig;

use crate::buffer::ActionLogBuffer;
use crate::context::RequestMeta;

/// One client-reported UI interaction, before context resolution.
#[derive(Debug, Clone)]
pub struct ActionEvent {
    /// Raw event type string (classifier input).
    pub event_type: String,
    /// Free-text identifier of the UI element or action.
    pub target: String,
}

/// Accepts telemetry events and buffers them off the request path.
///
/// `submit` hands the events plus the captured metadata snapshot to a
/// spawned task and returns immediately; a semaphore bounds how many
/// ingestion tasks run at once, giving fixed-size worker pool semantics
/// without dedicated threads. Buffering itself is synchronous and
/// non-blocking, so slow storage can never stall this path.
#[derive(Debug)]
pub struct IngestService {
    buffer: Arc<ActionLogBuffer>,
    limiter: Arc<Semaphore>,
}

impl IngestService {
    /// Create a new ingestion service over the shared buffer.
    pub fn new(buffer: Arc<ActionLogBuffer>, config: &IngestConfig) -> Self {
        Self {
            buffer,
            limiter: Arc::new(Semaphore::new(config.concurrency)),
        }
    }

    /// Hand off a batch of events for asynchronous buffering.
    ///
    /// The metadata snapshot is moved into the worker task, so the task
    /// observes exactly the request context that was current at
    /// submission time. The returned handle is only awaited by tests;
    /// the HTTP handler drops it and answers the client immediately.
    pub fn submit(&self, meta: RequestMeta, events: Vec<ActionEvent>) -> JoinHandle<()> {
        let buffer = Arc::clone(&self.buffer);
        let limiter = Arc::clone(&self.limiter);
        let span = tracing::info_span!(
            "ingest",
            origin = %meta.origin_address,
            path = %meta.url_name,
        );

        tokio::spawn(async move {
            // Closed only at shutdown; pending events are then dropped
            // with the rest of the volatile buffer.
            let Ok(_permit) = limiter.acquire_owned().await else {
                return;
            };

            span.in_scope(|| {
                let count = events.len();
                for event in &events {
                    buffer.enqueue(meta.build_record(event));
                }
                debug!(count, "Buffered action events");
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionlog_entity::action::{GroupKey, OperationKind};

    fn meta() -> RequestMeta {
        RequestMeta {
            origin_address: "10.0.0.1".to_string(),
            url_name: "/letters".to_string(),
            user_agent: "test-agent".to_string(),
            referrer: "Unknown".to_string(),
            locale: "en-US".to_string(),
            platform: "web".to_string(),
            app_version: "1.0.0".to_string(),
            os_version: "Unknown".to_string(),
            device_model: "Unknown".to_string(),
            screen_descriptor: "Unknown".to_string(),
        }
    }

    fn events(n: usize, event_type: &str) -> Vec<ActionEvent> {
        (0..n)
            .map(|i| ActionEvent {
                event_type: event_type.to_string(),
                target: format!("t{i}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_submit_buffers_all_events() {
        let buffer = Arc::new(ActionLogBuffer::new());
        let service = IngestService::new(Arc::clone(&buffer), &IngestConfig::default());

        service.submit(meta(), events(7, "read")).await.unwrap();

        let drained = buffer.drain_all();
        let key = GroupKey::new("10.0.0.1", OperationKind::Read);
        assert_eq!(drained[&key].len(), 7);
    }

    #[tokio::test]
    async fn test_submitted_records_carry_the_snapshot() {
        let buffer = Arc::new(ActionLogBuffer::new());
        let service = IngestService::new(Arc::clone(&buffer), &IngestConfig::default());

        service.submit(meta(), events(1, "purchase")).await.unwrap();

        let drained = buffer.drain_all();
        let key = GroupKey::new("10.0.0.1", OperationKind::Unknown);
        let record = &drained[&key][0];
        assert_eq!(record.url_name, "/letters");
        assert_eq!(record.locale, "en-US");
        assert_eq!(record.operation_type, "purchase");
    }

    #[tokio::test]
    async fn test_concurrent_submissions_all_land() {
        let buffer = Arc::new(ActionLogBuffer::new());
        let service = Arc::new(IngestService::new(
            Arc::clone(&buffer),
            &IngestConfig { concurrency: 2 },
        ));

        let handles: Vec<_> = (0..10)
            .map(|_| service.submit(meta(), events(10, "update")))
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(buffer.buffered_records(), 100);
    }
}
