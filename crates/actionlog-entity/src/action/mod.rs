//! Action-log domain types: operation classification, grouping key,
//! in-memory log records, and the persisted batch row.

pub mod key;
pub mod kind;
pub mod model;
pub mod record;

pub use key::GroupKey;
pub use kind::OperationKind;
pub use model::{ActionLogBatch, NewActionLogBatch};
pub use record::LogRecord;
