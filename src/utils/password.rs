// Password hashing and verification utilities using Argon2
// Legacy bcrypt hashes are still accepted on verify and flagged for rehash

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Errors that can occur during password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Hashing task aborted: {0}")]
    TaskAborted(String),
}

/// Argon2id cost parameters for account secrets
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub output_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            output_length: 32,
        }
    }
}

impl From<&crate::app_config::SecurityConfig> for PasswordConfig {
    fn from(config: &crate::app_config::SecurityConfig) -> Self {
        Self {
            memory_cost: config.password_memory_cost,
            time_cost: config.password_time_cost,
            ..Self::default()
        }
    }
}

impl PasswordConfig {
    fn build_hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_length),
        )
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$")
}

/// Hash a secret with a fresh salt into a PHC string (`$argon2id$...`)
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let argon2 = config.build_hasher()?;
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash (Argon2 PHC string or legacy bcrypt)
///
/// Comparison is constant-time inside the hashing primitives.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    if is_bcrypt_hash(hash) {
        return bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::VerificationError(e.to_string()));
    }

    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Params are read back from the hash itself
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationError(e.to_string())),
    }
}

/// True for bcrypt hashes and for Argon2 hashes made with other costs
pub fn needs_rehash(hash: &str, config: &PasswordConfig) -> Result<bool, PasswordError> {
    if is_bcrypt_hash(hash) {
        return Ok(true);
    }

    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    if parsed_hash.algorithm != Algorithm::Argon2id.ident() {
        return Ok(true);
    }

    for (ident, value) in parsed_hash.params.iter() {
        let expected = match ident.as_str() {
            "m" => config.memory_cost,
            "t" => config.time_cost,
            "p" => config.parallelism,
            _ => continue,
        };
        if let Ok(actual) = value.decimal() {
            if actual != expected {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Hash on the blocking pool so request tasks are not stalled by Argon2
pub async fn hash_password_async(
    password: String,
    config: PasswordConfig,
) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password_with_config(&password, &config))
        .await
        .map_err(|e| PasswordError::TaskAborted(e.to_string()))?
}

/// Verify on the blocking pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::TaskAborted(e.to_string()))?
}
