//! Flush pipeline: drain the buffer, serialize groups, append batches.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use actionlog_core::traits::BatchSink;
use actionlog_entity::action::{GroupKey, LogRecord, NewActionLogBatch, OperationKind};
use actionlog_service::buffer::ActionLogBuffer;
use actionlog_service::mapper;

/// Drains the shared buffer and persists the result.
///
/// One pipeline instance is shared by all three scheduler tiers. Each
/// call accumulates every serialized row of the run and submits them in
/// a single sink call; failures are contained per run — a group that
/// fails to serialize is dropped without affecting its siblings, and a
/// sink failure drops the run's rows without retry so the next cycle
/// starts clean.
#[derive(Clone)]
pub struct FlushPipeline {
    buffer: Arc<ActionLogBuffer>,
    sink: Arc<dyn BatchSink<NewActionLogBatch>>,
}

impl FlushPipeline {
    /// Create a new flush pipeline over the shared buffer and sink.
    pub fn new(
        buffer: Arc<ActionLogBuffer>,
        sink: Arc<dyn BatchSink<NewActionLogBatch>>,
    ) -> Self {
        Self { buffer, sink }
    }

    /// Flush groups of one kind whose backlog has reached `threshold`.
    ///
    /// Returns the number of rows written.
    pub async fn flush_kind(&self, kind: OperationKind, threshold: usize) -> u64 {
        let drained = self.buffer.drain_kind_if_threshold_met(kind, threshold);
        self.persist(drained).await
    }

    /// Flush several kinds in one run, each drained independently at
    /// `threshold`, with all resulting rows submitted together.
    pub async fn flush_kinds(&self, kinds: &[OperationKind], threshold: usize) -> u64 {
        let mut drained = HashMap::new();
        for &kind in kinds {
            drained.extend(self.buffer.drain_kind_if_threshold_met(kind, threshold));
        }
        self.persist(drained).await
    }

    /// Forced flush: empty every group regardless of backlog.
    pub async fn flush_all(&self) -> u64 {
        let drained = self.buffer.drain_all();
        self.persist(drained).await
    }

    /// Serialize the drained groups and append them in one sink call.
    async fn persist(&self, drained: HashMap<GroupKey, Vec<LogRecord>>) -> u64 {
        let mut rows = Vec::with_capacity(drained.len());

        for (key, records) in &drained {
            match mapper::to_batch(key, records) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    // Poison batch: drop it so the rest of the run and
                    // future cycles for this group keep flowing.
                    error!(
                        origin = %key.origin_address,
                        kind = %key.kind,
                        records = records.len(),
                        error = %e,
                        "Dropping unserializable batch"
                    );
                }
            }
        }

        if rows.is_empty() {
            return 0;
        }

        match self.sink.append_all(&rows).await {
            Ok(written) => {
                debug!(rows = written, groups = drained.len(), "Flushed action-log batches");
                written
            }
            Err(e) => {
                error!(
                    dropped_rows = rows.len(),
                    error = %e,
                    "Batch append failed; dropping this cycle's rows"
                );
                0
            }
        }
    }
}

impl std::fmt::Debug for FlushPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushPipeline").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use actionlog_core::error::AppError;
    use actionlog_core::result::AppResult;
    use actionlog_entity::action::LogRecord;

    /// In-memory sink capturing every append call.
    #[derive(Debug, Default)]
    struct RecordingSink {
        calls: Mutex<Vec<Vec<NewActionLogBatch>>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn all_rows(&self) -> Vec<NewActionLogBatch> {
            self.calls.lock().unwrap().iter().flatten().cloned().collect()
        }
    }

    #[async_trait]
    impl BatchSink<NewActionLogBatch> for RecordingSink {
        async fn append_all(&self, rows: &[NewActionLogBatch]) -> AppResult<u64> {
            self.calls.lock().unwrap().push(rows.to_vec());
            if self.fail {
                return Err(AppError::database("insert rejected"));
            }
            Ok(rows.len() as u64)
        }
    }

    fn record(origin: &str, operation_type: &str, target: &str) -> LogRecord {
        LogRecord {
            operation_type: operation_type.to_string(),
            target: target.to_string(),
            origin_address: origin.to_string(),
            user_agent: "test-agent".to_string(),
            referrer: "Unknown".to_string(),
            locale: "en-US".to_string(),
            platform: "web".to_string(),
            app_version: "1.0.0".to_string(),
            os_version: "Unknown".to_string(),
            device_model: "Unknown".to_string(),
            screen_descriptor: "Unknown".to_string(),
            url_name: "/letters".to_string(),
            captured_at: chrono::Utc::now(),
        }
    }

    fn pipeline_with(
        sink: Arc<RecordingSink>,
    ) -> (Arc<ActionLogBuffer>, FlushPipeline) {
        let buffer = Arc::new(ActionLogBuffer::new());
        let pipeline = FlushPipeline::new(Arc::clone(&buffer), sink);
        (buffer, pipeline)
    }

    #[tokio::test]
    async fn test_empty_drain_makes_no_sink_call() {
        let sink = Arc::new(RecordingSink::default());
        let (_buffer, pipeline) = pipeline_with(Arc::clone(&sink));

        assert_eq!(pipeline.flush_all().await, 0);
        assert_eq!(pipeline.flush_kind(OperationKind::Read, 100).await, 0);
        assert_eq!(sink.call_count(), 0);
    }

    #[tokio::test]
    async fn test_run_submits_all_groups_in_one_call() {
        let sink = Arc::new(RecordingSink::default());
        let (buffer, pipeline) = pipeline_with(Arc::clone(&sink));

        for i in 0..10 {
            buffer.enqueue(record("10.0.0.1", "create", &format!("c{i}")));
            buffer.enqueue(record("10.0.0.2", "delete", &format!("d{i}")));
        }

        let written = pipeline
            .flush_kinds(&OperationKind::NON_READ, 10)
            .await;
        assert_eq!(written, 2);
        assert_eq!(sink.call_count(), 1);

        let rows = sink.all_rows();
        let codes: Vec<&str> = rows.iter().map(|r| r.operation_code.as_str()).collect();
        assert!(codes.contains(&"C"));
        assert!(codes.contains(&"D"));
    }

    #[tokio::test]
    async fn test_kind_flush_leaves_other_kinds_buffered() {
        let sink = Arc::new(RecordingSink::default());
        let (buffer, pipeline) = pipeline_with(Arc::clone(&sink));

        for i in 0..100 {
            buffer.enqueue(record("10.0.0.1", "read", &format!("r{i}")));
        }
        for i in 0..10 {
            buffer.enqueue(record("10.0.0.1", "update", &format!("u{i}")));
        }

        let written = pipeline.flush_kind(OperationKind::Read, 100).await;
        assert_eq!(written, 1);
        assert_eq!(buffer.buffered_records(), 10);
    }

    #[tokio::test]
    async fn test_sink_failure_drops_rows_without_retry() {
        let sink = Arc::new(RecordingSink::failing());
        let (buffer, pipeline) = pipeline_with(Arc::clone(&sink));

        for i in 0..5 {
            buffer.enqueue(record("10.0.0.1", "read", &format!("r{i}")));
        }

        assert_eq!(pipeline.flush_all().await, 0);
        assert_eq!(sink.call_count(), 1);

        // Failed rows are not re-buffered; the next cycle sees nothing.
        assert_eq!(buffer.buffered_records(), 0);
        assert_eq!(pipeline.flush_all().await, 0);
        assert_eq!(sink.call_count(), 1);
    }

    #[tokio::test]
    async fn test_payload_round_trips_through_flush() {
        let sink = Arc::new(RecordingSink::default());
        let (buffer, pipeline) = pipeline_with(Arc::clone(&sink));

        let originals: Vec<LogRecord> = (0..3)
            .map(|i| record("10.0.0.1", "read", &format!("r{i}")))
            .collect();
        for r in &originals {
            buffer.enqueue(r.clone());
        }

        pipeline.flush_all().await;

        let rows = sink.all_rows();
        assert_eq!(rows.len(), 1);
        let decoded: Vec<LogRecord> =
            serde_json::from_str(&rows[0].log_payload).unwrap();
        assert_eq!(decoded, originals);
    }
}
