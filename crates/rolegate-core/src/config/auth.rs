//! Authentication configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Signing algorithms accepted for the symmetric token secret.
const HMAC_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Token signing and credential hashing configuration.
///
/// Loaded once at startup and handed to the token codec and password
/// hasher at construction time.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing. Required; never serialized back out.
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
    /// Signing algorithm identifier (`HS256`, `HS384`, or `HS512`).
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Role attached to every newly registered user.
    #[serde(default = "default_role")]
    pub default_role: String,
}

impl AuthConfig {
    /// Creates a configuration with the given secret and default values
    /// for everything else.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            jwt_algorithm: default_algorithm(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            default_role: default_role(),
        }
    }

    /// Rejects configurations the service cannot safely run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set (ROLEGATE__AUTH__JWT_SECRET)",
            ));
        }

        if !HMAC_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "auth.jwt_algorithm '{}' is not supported; expected one of {}",
                self.jwt_algorithm,
                HMAC_ALGORITHMS.join(", ")
            )));
        }

        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("token TTLs must be greater than zero"));
        }

        if self.default_role.trim().is_empty() {
            return Err(AppError::configuration("auth.default_role must not be empty"));
        }

        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("default_role", &self.default_role)
            .finish()
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_argon2_memory() -> u32 {
    64 * 1024
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    1
}

fn default_role() -> String {
    "viewer".to_string()
}
