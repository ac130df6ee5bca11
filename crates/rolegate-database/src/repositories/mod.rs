//! Store trait implementations for [`PgUnitOfWork`](crate::postgres::PgUnitOfWork),
//! one module per table group.

pub mod refresh_token;
pub mod role;
pub mod user;
