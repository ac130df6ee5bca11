//! # rolegate-entity
//!
//! Domain entity models for Rolegate. Every struct in this crate
//! represents a database table row or a value assembled from joined rows.
//! Table-backed entities additionally derive `sqlx::FromRow`.

pub mod role;
pub mod token;
pub mod user;
