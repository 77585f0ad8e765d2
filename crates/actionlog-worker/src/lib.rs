//! Background flushing for the action-log service.
//!
//! This crate provides:
//! - The flush pipeline that drains the buffer, serializes each drained
//!   group, and submits the whole run to the durable sink in one call
//! - The three fixed-delay tier loops (read, other, forced) with
//!   watch-channel shutdown

pub mod flush;
pub mod scheduler;

pub use flush::FlushPipeline;
pub use scheduler::FlushScheduler;
