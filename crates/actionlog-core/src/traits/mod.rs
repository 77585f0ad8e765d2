//! Core traits defined in `actionlog-core` and implemented by other crates.

pub mod sink;

pub use sink::BatchSink;
