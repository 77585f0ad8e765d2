//! # actionlog-core
//!
//! Core crate for the action-log service. Contains the unified error
//! system, configuration schemas, and the durable-sink trait implemented
//! by the database crate.
//!
//! This crate has **no** internal dependencies on other action-log crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
