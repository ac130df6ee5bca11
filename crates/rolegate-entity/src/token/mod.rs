//! Persisted refresh token ledger rows.

pub mod model;

pub use model::{NewRefreshToken, RefreshToken};
