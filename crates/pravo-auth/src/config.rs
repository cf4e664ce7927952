//! Engine configuration
//!
//! Built once at startup and injected into the codec and the service.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// bcrypt work factor bounds accepted by `validate`
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// Configuration consumed by the authentication engine
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: Vec<u8>,
    pub token_ttl: Duration,
    pub min_password_length: usize,
    pub bcrypt_cost: u32,
    pub store_timeout: Duration,
}

impl AuthConfig {
    /// Create a config with default policy around the given secret.
    pub fn new(secret_key: impl Into<Vec<u8>>) -> Result<Self> {
        let config = Self {
            secret_key: secret_key.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the token lifetime from a whole number of hours.
    pub fn with_token_ttl_hours(self, hours: u64) -> Result<Self> {
        let secs = hours
            .checked_mul(60 * 60)
            .ok_or_else(|| Error::config(format!("token TTL of {} hours is too large", hours)))?;
        Ok(self.with_token_ttl(Duration::from_secs(secs)))
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_min_password_length(mut self, len: usize) -> Self {
        self.min_password_length = len;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(Error::config("secret key must not be empty"));
        }
        if self.token_ttl.is_zero() {
            return Err(Error::config("token TTL must be positive"));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(Error::config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }
        if self.secret_key.len() < MIN_RECOMMENDED_SECRET_LEN {
            log::warn!(
                "Token secret is shorter than {} bytes. Consider using a longer secret.",
                MIN_RECOMMENDED_SECRET_LEN
            );
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("min_password_length", &self.min_password_length)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}
