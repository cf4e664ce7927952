//! Account storage
//!
//! `UserStore` abstracts persistence so the service can run against SQLite
//! in production and an in-memory map in tests.
//!
//! ## Structure
//! - `sqlite.rs` - SQLx/SQLite implementation
//! - `memory.rs` - `Mutex<HashMap>` implementation

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, NewAccount};

pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;

/// Persistence contract for accounts, keyed by email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find account by email. `Ok(None)` means no such account.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Find account by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Persist a new account, assigning its `id` and `created_at`.
    ///
    /// Fails with `Error::ConstraintViolation` if the email is already taken,
    /// including when a concurrent insert got there first.
    async fn insert(&self, account: NewAccount) -> Result<Account>;
}
