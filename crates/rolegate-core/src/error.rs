//! Unified application error types for Rolegate.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Domain failures (bad credentials,
//! bad tokens, conflicts) and store failures are separate kinds so callers
//! can tell a retryable outage from a definitive answer.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown username or wrong password. The two cases are never distinguished.
    InvalidCredentials,
    /// The identity was proven but the account is disabled.
    AccountDisabled,
    /// A unique value (username, email) is already taken.
    Conflict,
    /// The deployment is misconfigured (missing seed data, bad secret).
    Configuration,
    /// A token failed signature, expiry, kind, or revocation checks.
    InvalidToken,
    /// No usable identity could be established for a protected call.
    Unauthenticated,
    /// The caller is authenticated but lacks a required permission.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// The requested resource was not found.
    NotFound,
    /// The backing store is unreachable, timed out, or failed. Retryable.
    ServiceUnavailable,
    /// An unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// Return the machine-readable code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::Conflict => "CONFLICT",
            Self::Configuration => "CONFIGURATION",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout Rolegate.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password.")
    }

    /// Create an account-disabled error.
    pub fn account_disabled() -> Self {
        Self::new(ErrorKind::AccountDisabled, "Account is disabled.")
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "Invalid or expired token.")
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::ServiceUnavailable
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = AppError::conflict("Username or email already exists.");
        assert_eq!(
            err.to_string(),
            "CONFLICT: Username or email already exists."
        );
    }

    #[test]
    fn test_only_store_failures_are_retryable() {
        assert!(AppError::service_unavailable("pool timed out").is_retryable());
        assert!(!AppError::invalid_credentials().is_retryable());
        assert!(!AppError::configuration("missing role").is_retryable());
    }

    #[test]
    fn test_clone_drops_source() {
        let err = AppError::with_source(
            ErrorKind::Internal,
            "wrapped",
            std::io::Error::other("boom"),
        );
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Internal);
        assert!(cloned.source.is_none());
    }
}
