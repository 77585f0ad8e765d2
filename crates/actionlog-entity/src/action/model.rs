//! Persisted action-log batch row models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted batch of log records.
///
/// One row is written per `(group key, flush)` pair and never updated or
/// deleted by this pipeline. `write_time` is assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActionLogBatch {
    /// Unique batch identifier.
    pub id: i64,
    /// Originating client address (first forwarding hop or peer).
    pub ip_address: String,
    /// Operation kind code (`C`, `R`, `U`, `D`, `X`).
    pub operation_code: String,
    /// Representative request path, taken from the first record.
    pub url_name: String,
    /// JSON array of the serialized log records.
    pub log_payload: String,
    /// Server-assigned write timestamp.
    pub write_time: DateTime<Utc>,
}

/// Data required to insert a new action-log batch row.
///
/// Produced by the batch serializer at flush time; `id` and `write_time`
/// are assigned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActionLogBatch {
    /// Originating client address.
    pub ip_address: String,
    /// Operation kind code.
    pub operation_code: String,
    /// Representative request path.
    pub url_name: String,
    /// JSON array of the serialized log records.
    pub log_payload: String,
}
