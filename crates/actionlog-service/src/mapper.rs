//! Batch serializer: drained record groups → persistable batch rows.

use actionlog_core::error::AppError;
use actionlog_core::result::AppResult;
use actionlog_entity::action::{GroupKey, LogRecord, NewActionLogBatch};

/// Serialize one drained group into a single batch row.
///
/// The full record list becomes one JSON array in the row payload; the
/// representative URL is taken from the first (oldest) record. Callers
/// only drain non-empty groups, so an empty slice is rejected as an
/// internal error instead of panicking. A serialization failure means
/// the batch is dropped for this flush cycle — the caller logs it and
/// moves on to sibling groups.
pub fn to_batch(key: &GroupKey, records: &[LogRecord]) -> AppResult<NewActionLogBatch> {
    let first = records
        .first()
        .ok_or_else(|| AppError::internal("Refusing to serialize an empty batch"))?;

    let log_payload = serde_json::to_string(records)?;

    Ok(NewActionLogBatch {
        ip_address: key.origin_address.clone(),
        operation_code: key.kind.code().to_string(),
        url_name: first.url_name.clone(),
        log_payload,
    })
}
