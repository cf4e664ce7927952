//! # pravo-auth
//!
//! Authentication engine for Pravo.
//!
//! This crate provides:
//! - Password hashing and HS256 bearer tokens (`auth` module)
//! - The account storage contract and its adapters (`store` module)
//! - Registration and login orchestration (`service` module)
//! - Database setup (`db` module)
//! - Engine configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use auth::{Clock, FixedClock, PasswordHasher, SystemClock, TokenCodec, MAX_PASSWORD_BYTES};
pub use config::{AuthConfig, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use db::Database;
pub use error::{Error, Result};
pub use service::AuthService;
pub use store::{InMemoryUserStore, SqliteUserStore, UserStore};

// Re-export commonly used types from models
pub use models::{
    Account, AccountResponse, Claims, LoginRequest, LoginResponse, NewAccount, RegisterRequest,
    TokenResponse,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
