//! Unified error handling for pravo-auth

use thiserror::Error;

/// Core error type for pravo-auth
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account already exists")]
    AccountExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not active")]
    AccountInactive,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    /// A write was rejected by the store's uniqueness constraint.
    #[error("Unique constraint violated")]
    ConstraintViolation,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store call timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for pravo-auth
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a malformed token error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedToken(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// HTTP status code the transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::AccountExists => 409,
            Error::InvalidCredentials => 401,
            Error::AccountInactive => 403,
            Error::InvalidInput(_) | Error::MalformedToken(_) => 400,
            Error::InvalidSignature | Error::TokenExpired => 401,
            Error::Timeout => 504,
            Error::ConstraintViolation
            | Error::Database(_)
            | Error::Hash(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Internal(_) => 500,
        }
    }

    /// Message that is safe to hand back to a caller.
    ///
    /// Store, hashing and configuration failures collapse into an opaque
    /// message so no backend detail leaks out.
    pub fn public_message(&self) -> String {
        match self {
            Error::ConstraintViolation
            | Error::Database(_)
            | Error::Hash(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}
