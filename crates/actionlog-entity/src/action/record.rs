//! In-memory log record produced by the event context builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fully-resolved telemetry event.
///
/// Built once per inbound event from the client payload plus the ambient
/// request metadata, then treated as immutable: the buffer moves it and
/// the batch serializer reads it, but nothing mutates it. Optional
/// metadata is already resolved to the `"Unknown"` sentinel at
/// construction so downstream code never branches on absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Raw event type string as sent by the client (classifier input).
    pub operation_type: String,
    /// Free-text identifier of the UI element or action.
    pub target: String,
    /// Resolved client network address.
    pub origin_address: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Referer header value.
    pub referrer: String,
    /// Accept-Language header value.
    pub locale: String,
    /// Client platform identifier.
    pub platform: String,
    /// Client application version.
    pub app_version: String,
    /// Client operating system version.
    pub os_version: String,
    /// Client device model.
    pub device_model: String,
    /// Client screen descriptor.
    pub screen_descriptor: String,
    /// Request path the event is associated with.
    pub url_name: String,
    /// When this record was constructed.
    pub captured_at: DateTime<Utc>,
}
