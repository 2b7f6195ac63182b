//! Salted one-way password hashing with Argon2id
//!
//! Hashing is CPU-bound, so both hashing and verification run on
//! the blocking thread pool instead of the async workers.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};

/// Argon2 cost parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    /// Create a new PasswordConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ARGON2_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `ARGON2_ITERATIONS`: Number of passes (default: 2)
    /// - `ARGON2_PARALLELISM`: Degree of parallelism (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let memory_kib = std::env::var("ARGON2_MEMORY_KIB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.memory_kib);

        let iterations = std::env::var("ARGON2_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.iterations);

        let parallelism = std::env::var("ARGON2_PARALLELISM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.parallelism);

        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// Hashes new passwords and verifies candidates against stored PHC strings
#[derive(Clone)]
pub struct PasswordManager {
    params: Params,
}

impl PasswordManager {
    /// Fails if the configured cost parameters are out of Argon2's range
    pub fn new(config: &PasswordConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {}", e))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub async fn hash(&self, password: &str) -> Result<String> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || -> Result<String> {
            let salt = SaltString::generate(&mut rand::thread_rng());
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        })
        .await?
    }

    /// Check `password` against a stored hash
    ///
    /// The cost parameters embedded in the stored hash are used, so hashes
    /// created under an older configuration keep verifying.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let argon2 = self.argon2();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || -> Result<bool> {
            let parsed_hash = PasswordHash::new(&stored_hash)
                .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

            match argon2.verify_password(password.as_bytes(), &parsed_hash) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow::anyhow!("Failed to verify password: {}", e)),
            }
        })
        .await?
    }
}
