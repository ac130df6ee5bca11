//! # rolegate-database
//!
//! Persistence for Rolegate. Defines the unit-of-work store traits the
//! auth core consumes, a PostgreSQL implementation backed by sqlx
//! transactions, and an in-memory implementation with the same atomicity
//! guarantees.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryAuthStore;
pub use postgres::PgAuthStore;
pub use store::{AuthStore, RefreshTokenStore, RoleGraphStore, UnitOfWork, UserStore};
