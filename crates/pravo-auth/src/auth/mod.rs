//! Authentication primitives - password hashing and signed tokens
//!
//! Both primitives are leaf components with no knowledge of accounts or
//! storage; `service::AuthService` composes them.

pub mod password;
pub mod token;

pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{Clock, FixedClock, SystemClock, TokenCodec};
