//! Convenience result type alias for Rolegate.

use crate::error::AppError;

/// A specialized `Result` type for Rolegate operations.
pub type AppResult<T> = Result<T, AppError>;
