//! In-memory implementation of UserStore

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::UserStore;
use crate::error::{Error, Result};
use crate::models::{Account, NewAccount};

/// Account store backed by a `HashMap` keyed by email
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an already-built account
    pub fn with_account(self, account: Account) -> Self {
        self.lock().insert(account.email.clone(), account);
        self
    }

    /// Operator-level switch for the `is_active` flag.
    ///
    /// Returns `false` when no account has that email.
    pub fn set_active(&self, email: &str, active: bool) -> bool {
        match self.lock().get_mut(email) {
            Some(account) => {
                account.is_active = active;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.lock().get(email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.lock().values().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, new_account: NewAccount) -> Result<Account> {
        let mut accounts = self.lock();
        if accounts.contains_key(&new_account.email) {
            return Err(Error::ConstraintViolation);
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: new_account.email,
            name: new_account.name,
            password_hash: new_account.password_hash,
            is_active: new_account.is_active,
            created_at: Utc::now(),
        };
        accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }
}
