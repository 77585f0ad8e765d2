//! # actionlog-entity
//!
//! Domain entity models for the action-log service. Every struct in this
//! crate is either a value object used by the in-memory pipeline or a
//! database table row. Database entities derive `sqlx::FromRow`.

pub mod action;
