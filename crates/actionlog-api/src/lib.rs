//! # actionlog-api
//!
//! HTTP API layer for the action-log service built on Axum.
//!
//! Provides the telemetry ingestion endpoint, health endpoints,
//! the request-metadata extractor, request logging middleware,
//! DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
