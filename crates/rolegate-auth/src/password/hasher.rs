//! Argon2id password hashing and verification.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use rolegate_core::config::AuthConfig;
use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;

/// Plaintext hashed once at construction so that lookups for unknown users
/// can still pay for a full verification.
const DUMMY_PASSWORD: &str = "rolegate-dummy-password";

/// Hashes and verifies passwords using Argon2id with configurable cost.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Cost parameters applied to new hashes.
    params: Params,
    /// Digest verified against when the user does not exist.
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Creates a hasher from the Argon2 cost settings in `config`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash_password(DUMMY_PASSWORD)?);
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt, returning a PHC string.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC string.
    ///
    /// A malformed digest never matches.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Runs a verification against the dummy digest and discards the result.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify_password(password, &self.dummy_hash);
    }

    /// [`hash_password`](Self::hash_password) on the blocking thread pool.
    pub async fn hash_password_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Password hashing task panicked", e)
            })?
    }

    /// [`verify_password`](Self::verify_password) on the blocking thread pool.
    ///
    /// With `hash = None` the dummy digest is verified instead and the
    /// result is always `false`.
    pub async fn verify_password_blocking(
        &self,
        password: String,
        hash: Option<String>,
    ) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify_password(&password, &hash),
            None => {
                hasher.verify_dummy(&password);
                false
            }
        })
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Password verification task panicked", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_config() -> AuthConfig {
        let mut config = AuthConfig::with_secret("test-secret");
        config.argon2_memory_kib = 1024;
        config.argon2_iterations = 1;
        config
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(&cheap_config()).unwrap();
        let hash = hasher.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse", &hash));
        assert!(!hasher.verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new(&cheap_config()).unwrap();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_digest_is_false() {
        let hasher = PasswordHasher::new(&cheap_config()).unwrap();
        assert!(!hasher.verify_password("anything", "not-a-phc-string"));
        assert!(!hasher.verify_password("anything", ""));
    }

    #[test]
    fn test_cost_is_encoded_in_digest() {
        let hasher = PasswordHasher::new(&cheap_config()).unwrap();
        let hash = hasher.hash_password("pw").unwrap();
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_invalid_params_are_configuration_errors() {
        let mut config = cheap_config();
        config.argon2_parallelism = 0;
        let err = PasswordHasher::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = PasswordHasher::new(&cheap_config()).unwrap();
        let hash = hasher
            .hash_password_blocking("secret123".to_string())
            .await
            .unwrap();

        assert!(
            hasher
                .verify_password_blocking("secret123".to_string(), Some(hash))
                .await
                .unwrap()
        );
        assert!(
            !hasher
                .verify_password_blocking("secret123".to_string(), None)
                .await
                .unwrap()
        );
    }
}
