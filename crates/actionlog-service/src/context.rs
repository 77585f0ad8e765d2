//! Ambient request metadata: capture on the request path, explicit
//! propagation into ingestion workers.
//!
//! The HTTP layer captures one immutable [`RequestMeta`] snapshot per
//! request. The snapshot is then moved — as an owned value — into the
//! worker task that builds and buffers log records, so the worker
//! observes exactly the metadata that was current at submission time and
//! nothing lingers on the worker once the task completes. No
//! thread-local state is involved.

use actionlog_entity::action::LogRecord;
use chrono::Utc;

use crate::ingest::ActionEvent;

/// Sentinel for ambient metadata the client did not send.
pub const UNKNOWN: &str = "Unknown";

/// Immutable snapshot of per-request ambient metadata.
///
/// Every field is already resolved at capture time: optional headers are
/// replaced by the [`UNKNOWN`] sentinel so record construction never
/// deals with absence.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMeta {
    /// Resolved client network address.
    pub origin_address: String,
    /// Request path the events are associated with.
    pub url_name: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Referer header value.
    pub referrer: String,
    /// Accept-Language header value.
    pub locale: String,
    /// X-Platform header value.
    pub platform: String,
    /// X-App-Version header value.
    pub app_version: String,
    /// X-OS-Version header value.
    pub os_version: String,
    /// X-Device-Model header value.
    pub device_model: String,
    /// X-Screen header value.
    pub screen_descriptor: String,
}

impl RequestMeta {
    /// Build one fully-resolved log record from a client event.
    ///
    /// This is the event context builder: it always succeeds, stamps the
    /// capture time, and copies the ambient snapshot into the record.
    pub fn build_record(&self, event: &ActionEvent) -> LogRecord {
        LogRecord {
            operation_type: event.event_type.clone(),
            target: event.target.clone(),
            origin_address: self.origin_address.clone(),
            user_agent: self.user_agent.clone(),
            referrer: self.referrer.clone(),
            locale: self.locale.clone(),
            platform: self.platform.clone(),
            app_version: self.app_version.clone(),
            os_version: self.os_version.clone(),
            device_model: self.device_model.clone(),
            screen_descriptor: self.screen_descriptor.clone(),
            url_name: self.url_name.clone(),
            captured_at: Utc::now(),
        }
    }
}

/// Resolve an optional header value to the [`UNKNOWN`] sentinel.
pub fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Resolve the client origin address.
///
/// The first hop of an `X-Forwarded-For` chain wins; otherwise the
/// direct peer address is used.
pub fn client_origin(forwarded_for: Option<&str>, peer_address: Option<&str>) -> String {
    if let Some(forwarded) = forwarded_for {
        if let Some(first_hop) = forwarded.split(',').next() {
            let first_hop = first_hop.trim();
            if !first_hop.is_empty() {
                return first_hop.to_string();
            }
        }
    }
    or_unknown(peer_address)
}
