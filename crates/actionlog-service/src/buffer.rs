//! Concurrent in-memory buffer grouping log records by origin and kind.

use std::collections::{HashMap, VecDeque};

use dashmap::DashMap;
use tracing::trace;

use actionlog_entity::action::{GroupKey, LogRecord, OperationKind};

/// Process-wide buffer of pending log records.
///
/// Records are grouped into per-key FIFO queues inside a sharded
/// concurrent map: producers on different keys land on different shards
/// and effectively never contend, while a producer hitting a key that is
/// mid-drain waits only for that one shard lock. An enqueue racing a
/// drain on the same key either makes it into the drained batch or stays
/// queued for the next cycle — it is never lost and never duplicated.
///
/// Queues are created lazily on first enqueue and left in place once
/// emptied; key cardinality is bounded by distinct client origins times
/// five operation kinds, so empty queues are not reaped.
///
/// The buffer is volatile: records not yet flushed are lost if the
/// process terminates.
#[derive(Debug, Default)]
pub struct ActionLogBuffer {
    groups: DashMap<GroupKey, VecDeque<LogRecord>>,
}

impl ActionLogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Append a record to the tail of its group's queue.
    ///
    /// The group key is derived here: the record's raw operation type is
    /// classified and combined with its origin address.
    pub fn enqueue(&self, record: LogRecord) {
        let key = GroupKey::new(
            record.origin_address.clone(),
            OperationKind::classify(&record.operation_type),
        );

        trace!(origin = %key.origin_address, kind = %key.kind, "Buffering record");
        self.groups.entry(key).or_default().push_back(record);
    }

    /// Drain every group whose backlog has reached `threshold`.
    ///
    /// For each such group exactly `threshold` records are removed from
    /// the head of the queue (oldest first); groups below the threshold
    /// are left untouched and absent from the result.
    pub fn drain_if_threshold_met(
        &self,
        threshold: usize,
    ) -> HashMap<GroupKey, Vec<LogRecord>> {
        let mut drained = HashMap::new();

        for mut entry in self.groups.iter_mut() {
            let queue = entry.value_mut();
            if queue.len() >= threshold {
                let records: Vec<LogRecord> = queue.drain(..threshold).collect();
                if !records.is_empty() {
                    drained.insert(entry.key().clone(), records);
                }
            }
        }

        drained
    }

    /// Drain groups of a single operation kind that have reached `threshold`.
    ///
    /// Same contract as [`ActionLogBuffer::drain_if_threshold_met`], but
    /// groups of other kinds are not touched at all — a flush tier can
    /// take its own kinds without disturbing records belonging to a
    /// sibling tier.
    pub fn drain_kind_if_threshold_met(
        &self,
        kind: OperationKind,
        threshold: usize,
    ) -> HashMap<GroupKey, Vec<LogRecord>> {
        let mut drained = HashMap::new();

        for mut entry in self.groups.iter_mut() {
            if entry.key().kind != kind {
                continue;
            }
            let queue = entry.value_mut();
            if queue.len() >= threshold {
                let records: Vec<LogRecord> = queue.drain(..threshold).collect();
                if !records.is_empty() {
                    drained.insert(entry.key().clone(), records);
                }
            }
        }

        drained
    }

    /// Unconditionally empty every group's queue.
    ///
    /// Groups that are already empty are omitted from the result but
    /// remain present in the map.
    pub fn drain_all(&self) -> HashMap<GroupKey, Vec<LogRecord>> {
        let mut drained = HashMap::new();

        for mut entry in self.groups.iter_mut() {
            let queue = entry.value_mut();
            if !queue.is_empty() {
                let records: Vec<LogRecord> = queue.drain(..).collect();
                drained.insert(entry.key().clone(), records);
            }
        }

        drained
    }

    /// Total number of buffered records across all groups.
    pub fn buffered_records(&self) -> usize {
        self.groups.iter().map(|entry| entry.value().len()).sum()
    }

    /// Number of known groups, including emptied ones.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

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

    #[test]
    fn test_enqueue_groups_by_origin_and_kind() {
        let buffer = ActionLogBuffer::new();
        buffer.enqueue(record("10.0.0.1", "read", "a"));
        buffer.enqueue(record("10.0.0.1", "create", "b"));
        buffer.enqueue(record("10.0.0.2", "read", "c"));

        let drained = buffer.drain_all();
        assert_eq!(drained.len(), 3);
        assert_eq!(
            drained[&GroupKey::new("10.0.0.1", OperationKind::Read)].len(),
            1
        );
        assert_eq!(
            drained[&GroupKey::new("10.0.0.1", OperationKind::Create)].len(),
            1
        );
        assert_eq!(
            drained[&GroupKey::new("10.0.0.2", OperationKind::Read)].len(),
            1
        );
    }

    #[test]
    fn test_below_threshold_groups_are_untouched() {
        let buffer = ActionLogBuffer::new();
        for i in 0..5 {
            buffer.enqueue(record("10.0.0.1", "read", &format!("t{i}")));
        }

        let drained = buffer.drain_if_threshold_met(100);
        assert!(drained.is_empty());
        assert_eq!(buffer.buffered_records(), 5);
    }

    #[test]
    fn test_threshold_drain_takes_exactly_threshold_oldest() {
        let buffer = ActionLogBuffer::new();
        for i in 0..12 {
            buffer.enqueue(record("10.0.0.1", "create", &format!("t{i}")));
        }

        let drained = buffer.drain_if_threshold_met(10);
        let key = GroupKey::new("10.0.0.1", OperationKind::Create);
        let taken: Vec<String> = drained[&key].iter().map(|r| r.target.clone()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
        assert_eq!(taken, expected);

        // Only the two newest remain, still in order.
        let rest = buffer.drain_all();
        let remaining: Vec<String> = rest[&key].iter().map(|r| r.target.clone()).collect();
        assert_eq!(remaining, vec!["t10".to_string(), "t11".to_string()]);
    }

    #[test]
    fn test_drain_kind_ignores_other_kinds() {
        let buffer = ActionLogBuffer::new();
        for i in 0..20 {
            buffer.enqueue(record("10.0.0.1", "read", &format!("r{i}")));
            buffer.enqueue(record("10.0.0.1", "delete", &format!("d{i}")));
        }

        let drained = buffer.drain_kind_if_threshold_met(OperationKind::Delete, 10);
        assert_eq!(drained.len(), 1);
        assert!(
            drained.contains_key(&GroupKey::new("10.0.0.1", OperationKind::Delete))
        );
        // Read records stay behind in full.
        assert_eq!(buffer.buffered_records(), 20 + 10);
    }

    #[test]
    fn test_drain_all_on_empty_buffer_is_idempotent() {
        let buffer = ActionLogBuffer::new();
        assert!(buffer.drain_all().is_empty());

        buffer.enqueue(record("10.0.0.1", "read", "a"));
        assert_eq!(buffer.drain_all().len(), 1);

        // Emptied group stays known but yields nothing.
        assert!(buffer.drain_all().is_empty());
        assert_eq!(buffer.group_count(), 1);
        assert_eq!(buffer.buffered_records(), 0);
    }

    #[test]
    fn test_scenario_fast_tier_misses_then_forced_flush_takes_all() {
        let buffer = ActionLogBuffer::new();
        for i in 0..5 {
            buffer.enqueue(record("10.0.0.1", "read", &format!("t{i}")));
        }

        assert!(buffer.drain_if_threshold_met(100).is_empty());

        let drained = buffer.drain_all();
        let key = GroupKey::new("10.0.0.1", OperationKind::Read);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[&key].len(), 5);
    }

    #[test]
    fn test_scenario_repeated_threshold_drain_then_forced() {
        let buffer = ActionLogBuffer::new();
        for i in 0..12 {
            buffer.enqueue(record("10.0.0.1", "create", &format!("t{i}")));
        }
        let key = GroupKey::new("10.0.0.1", OperationKind::Create);

        let first = buffer.drain_if_threshold_met(10);
        assert_eq!(first[&key].len(), 10);

        let second = buffer.drain_if_threshold_met(10);
        assert!(second.is_empty());

        let forced = buffer.drain_all();
        assert_eq!(forced[&key].len(), 2);
    }

    #[test]
    fn test_concurrent_producers_and_drainer_lose_nothing() {
        let buffer = Arc::new(ActionLogBuffer::new());
        let mut seen: HashSet<String> = HashSet::new();

        let drained_during_run = std::thread::scope(|scope| {
            for producer in 0..2 {
                let buffer = Arc::clone(&buffer);
                scope.spawn(move || {
                    for i in 0..1000 {
                        buffer.enqueue(record(
                            "10.0.0.1",
                            "read",
                            &format!("p{producer}-{i}"),
                        ));
                    }
                });
            }

            let buffer = Arc::clone(&buffer);
            scope
                .spawn(move || {
                    let mut collected = Vec::new();
                    for _ in 0..100 {
                        for records in buffer.drain_if_threshold_met(50).into_values() {
                            collected.extend(records);
                        }
                        std::thread::yield_now();
                    }
                    collected
                })
                .join()
                .expect("drainer thread panicked")
        });

        for r in drained_during_run {
            assert!(seen.insert(r.target), "duplicate record drained");
        }
        for records in buffer.drain_all().into_values() {
            for r in records {
                assert!(seen.insert(r.target), "duplicate record drained");
            }
        }

        assert_eq!(seen.len(), 2000);
    }
}
