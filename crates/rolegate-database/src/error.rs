//! Mapping from sqlx errors into the application error taxonomy.

use rolegate_core::error::{AppError, ErrorKind};

/// SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Convert a sqlx error into an [`AppError`].
///
/// Unique-constraint violations become `Conflict` and foreign-key
/// violations become `NotFound`. Values the database refuses to store
/// (SQLSTATE class `22` data exceptions and check violations) become
/// `Validation`. Every other failure is a store failure and maps to the
/// retryable `ServiceUnavailable` kind.
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => ErrorKind::NotFound,
        sqlx::Error::Database(db_err)
            if db_err.is_check_violation() || db_err.code().is_some_and(|c| rejects_value(&c)) =>
        {
            ErrorKind::Validation
        }
        _ => ErrorKind::ServiceUnavailable,
    };

    let message = match (&kind, &err) {
        (ErrorKind::Conflict, _) => format!("{context}: value already exists"),
        (ErrorKind::NotFound, _) => format!("{context}: referenced row does not exist"),
        (ErrorKind::Validation, _) => format!("{context}: value rejected by the database"),
        (_, sqlx::Error::PoolTimedOut) => {
            format!("{context}: timed out waiting for a database connection")
        }
        _ => format!("{context}: {err}"),
    };

    AppError::with_source(kind, message, err)
}

/// Whether a SQLSTATE code means the submitted value itself is unacceptable.
fn rejects_value(code: &str) -> bool {
    code.starts_with("22") || code == CHECK_VIOLATION
}
