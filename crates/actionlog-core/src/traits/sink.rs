//! Durable append sink trait for flushed log batches.

use async_trait::async_trait;

use crate::result::AppResult;

/// Append-only sink for serialized log batches.
///
/// The trait is generic over the row type so that the concrete repository
/// in `actionlog-database` can implement it for the persisted batch model
/// while tests substitute an in-memory collector. The pipeline never
/// updates or deletes rows through this boundary; a whole scheduler run
/// is submitted as one call.
#[async_trait]
pub trait BatchSink<Row>: Send + Sync + 'static
where
    Row: Send + Sync + 'static,
{
    /// Append all rows in a single batched write.
    ///
    /// Returns the number of rows written. A failure covers the entire
    /// batch; callers treat it as non-fatal and do not retry.
    async fn append_all(&self, rows: &[Row]) -> AppResult<u64>;
}
