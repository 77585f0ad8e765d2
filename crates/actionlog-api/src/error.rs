//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse for AppError` mapping lives in `actionlog-core`
//! alongside the `AppError` definition (Rust's orphan rule requires the
//! trait impl to sit in the crate that owns the type). The response body
//! type is re-exported here so the API crate's error surface is unchanged.

pub use actionlog_core::error::ApiErrorResponse;
