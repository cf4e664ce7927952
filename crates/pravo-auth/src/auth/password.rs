//! Password hashing
//!
//! bcrypt strings carry the algorithm id, work factor and salt, so a stored
//! hash verifies later without any other state.

use crate::error::{Error, Result};

/// bcrypt only reads this many bytes of input; anything longer is refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way hashing and verification of raw passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected with
    /// `Error::InvalidInput`.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::invalid_input(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns `Ok(false)` for a well-formed hash that does not match and
    /// `Err(Error::Hash)` when the stored hash cannot be parsed. A password
    /// over [`MAX_PASSWORD_BYTES`] never matches, since `hash` refuses it.
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Hash on the blocking pool.
    ///
    /// The work always runs to completion; if the caller is dropped first the
    /// result is discarded.
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::internal(format!("hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool.
    pub async fn verify_async(&self, hash: String, password: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| Error::internal(format!("verify task failed: {}", e)))?
    }
}
