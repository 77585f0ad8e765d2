//! Action-log batch repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use actionlog_core::error::{AppError, ErrorKind};
use actionlog_core::result::AppResult;
use actionlog_core::traits::BatchSink;
use actionlog_entity::action::{ActionLogBatch, NewActionLogBatch};

/// Repository for persisted action-log batches.
///
/// The pipeline only appends through [`BatchSink`]; the read helpers
/// exist for health reporting and operational inspection.
#[derive(Debug, Clone)]
pub struct ActionLogBatchRepository {
    pool: PgPool,
}

impl ActionLogBatchRepository {
    /// Create a new action-log batch repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count all persisted batches.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM action_log_batches")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count batches", e)
            })
    }

    /// Find the most recently written batch, if any.
    pub async fn find_latest(&self) -> AppResult<Option<ActionLogBatch>> {
        sqlx::query_as::<_, ActionLogBatch>(
            "SELECT * FROM action_log_batches ORDER BY write_time DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find latest batch", e)
        })
    }
}

#[async_trait]
impl BatchSink<NewActionLogBatch> for ActionLogBatchRepository {
    /// Append all rows in a single multi-row INSERT.
    ///
    /// The whole scheduler run goes to the database as one statement so
    /// write amplification stays proportional to flush cycles, not to
    /// groups. `write_time` is assigned by the column default.
    async fn append_all(&self, rows: &[NewActionLogBatch]) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut ip_addresses = Vec::with_capacity(rows.len());
        let mut operation_codes = Vec::with_capacity(rows.len());
        let mut url_names = Vec::with_capacity(rows.len());
        let mut log_payloads = Vec::with_capacity(rows.len());

        for row in rows {
            ip_addresses.push(row.ip_address.as_str());
            operation_codes.push(row.operation_code.as_str());
            url_names.push(row.url_name.as_str());
            log_payloads.push(row.log_payload.as_str());
        }

        let result = sqlx::query(
            "INSERT INTO action_log_batches (ip_address, operation_code, url_name, log_payload) \
             SELECT * FROM UNNEST($1::varchar[], $2::varchar[], $3::varchar[], $4::varchar[])",
        )
        .bind(&ip_addresses)
        .bind(&operation_codes)
        .bind(&url_names)
        .bind(&log_payloads)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append batches", e)
        })?;

        Ok(result.rows_affected())
    }
}
