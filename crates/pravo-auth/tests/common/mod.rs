//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pravo_auth::{
    Account, AuthConfig, AuthService, FixedClock, NewAccount, Result, TokenCodec, UserStore,
    MIN_BCRYPT_COST,
};
use tokio::sync::Barrier;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const NOW: i64 = 1_750_000_000;

pub fn test_config() -> AuthConfig {
    AuthConfig::new(SECRET)
        .expect("valid config")
        .with_bcrypt_cost(MIN_BCRYPT_COST)
}

/// Service over `store` with a clock pinned at `NOW`
pub fn service_with<S: UserStore>(store: Arc<S>) -> (AuthService<S>, Arc<FixedClock>) {
    service_with_config(store, test_config())
}

pub fn service_with_config<S: UserStore>(
    store: Arc<S>,
    config: AuthConfig,
) -> (AuthService<S>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(NOW));
    let codec = TokenCodec::new(&config.secret_key, clock.clone()).expect("valid codec");
    (AuthService::with_codec(store, codec, config), clock)
}

/// Holds every `find_by_email` until `parties` callers have arrived, so that
/// concurrent registrations all pass the pre-check before any insert runs.
pub struct BarrierStore<S> {
    inner: S,
    barrier: Barrier,
}

impl<S> BarrierStore<S> {
    pub fn new(inner: S, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: UserStore> UserStore for BarrierStore<S> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let found = self.inner.find_by_email(email).await?;
        self.barrier.wait().await;
        Ok(found)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        self.inner.insert(account).await
    }
}

/// Store whose lookups never finish in time
pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl UserStore for SlowStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Account>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn insert(&self, _account: NewAccount) -> Result<Account> {
        tokio::time::sleep(self.delay).await;
        Err(pravo_auth::Error::internal("slow store never inserts"))
    }
}
