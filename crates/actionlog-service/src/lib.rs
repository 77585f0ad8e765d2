//! # actionlog-service
//!
//! The in-process ingestion pipeline: request-metadata capture and
//! propagation, event context building, the concurrent group buffer,
//! the batch serializer, and the asynchronous ingestion service.

pub mod buffer;
pub mod context;
pub mod ingest;
pub mod mapper;

pub use buffer::ActionLogBuffer;
pub use context::RequestMeta;
pub use ingest::{ActionEvent, IngestService};
