//! Auth business logic
//!
//! Registration and login orchestrated over a `UserStore`, the password
//! hasher and the token codec. The service keeps no per-call state, so one
//! instance can serve any number of concurrent requests.

use std::future::Future;
use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenCodec, MAX_PASSWORD_BYTES};
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::models::{
    Account, Claims, LoginRequest, LoginResponse, NewAccount, RegisterRequest, TokenResponse,
};
use crate::store::UserStore;

const MIN_NAME_LENGTH: usize = 2;

/// Registration, login and token checks over a user store
pub struct AuthService<S> {
    store: Arc<S>,
    hasher: PasswordHasher,
    codec: TokenCodec,
    config: AuthConfig,
}

impl<S> Clone for AuthService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            hasher: self.hasher,
            codec: self.codec.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: UserStore> AuthService<S> {
    /// Build a service with a wall-clock codec keyed from `config`
    pub fn new(store: Arc<S>, config: AuthConfig) -> Result<Self> {
        let codec = TokenCodec::with_system_clock(&config.secret_key)?;
        Ok(Self::with_codec(store, codec, config))
    }

    /// Build a service around an existing codec (e.g. one with a fixed clock)
    pub fn with_codec(store: Arc<S>, codec: TokenCodec, config: AuthConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(config.bcrypt_cost),
            codec,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Register a new account.
    ///
    /// The email pre-check only saves hashing work; the store's uniqueness
    /// constraint decides races between concurrent registrations.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account> {
        validate_email(&request.email)?;
        let name = normalize_name(request.name)?;
        if request.password.is_empty() {
            return Err(Error::invalid_input("password is required"));
        }
        if request.password.chars().count() < self.config.min_password_length {
            return Err(Error::invalid_input(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )));
        }
        if request.password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::invalid_input(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        if self
            .with_timeout(self.store.find_by_email(&request.email))
            .await?
            .is_some()
        {
            return Err(Error::AccountExists);
        }

        let password_hash = self.hasher.hash_async(request.password).await?;

        let new_account = NewAccount {
            email: request.email,
            name,
            password_hash,
            is_active: true,
        };

        let account = match self.with_timeout(self.store.insert(new_account)).await {
            Ok(account) => account,
            Err(Error::ConstraintViolation) => {
                log::info!("Registration lost a race for an already-taken email");
                return Err(Error::AccountExists);
            }
            Err(e) => return Err(e),
        };

        log::info!("Registered account {}", account.id);
        Ok(account)
    }

    /// Log in and issue a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(Error::invalid_input("email and password are required"));
        }

        let account = self
            .with_timeout(self.store.find_by_email(&request.email))
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !account.is_active {
            log::warn!("Login refused for inactive account {}", account.id);
            return Err(Error::AccountInactive);
        }

        let valid = self
            .hasher
            .verify_async(account.password_hash.clone(), request.password)
            .await?;
        if !valid {
            log::debug!("Password mismatch for account {}", account.id);
            return Err(Error::InvalidCredentials);
        }

        let token = self.issue_token(&account);
        log::info!("Account {} logged in", account.id);

        Ok(LoginResponse { account, token })
    }

    /// Issue a bearer token for an account the caller already trusts
    pub fn issue_token(&self, account: &Account) -> TokenResponse {
        let ttl = self.config.token_ttl;
        let access_token = self.codec.issue(&account.id, &account.email, ttl);
        TokenResponse::bearer(access_token, i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
    }

    /// Verify a bearer token
    pub fn authenticate(&self, token: &str) -> Result<Claims> {
        self.codec.verify(token)
    }

    /// Verify a bearer token and load the account it names.
    ///
    /// A token for a deleted account is treated like bad credentials.
    pub async fn current_account(&self, token: &str) -> Result<Account> {
        let claims = self.authenticate(token)?;

        let account = self
            .with_timeout(self.store.find_by_id(&claims.user_id))
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !account.is_active {
            return Err(Error::AccountInactive);
        }
        Ok(account)
    }

    async fn with_timeout<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.config.store_timeout, call)
            .await
            .map_err(|_| Error::Timeout)?
    }
}

/// Basic shape check: `local@domain.tld`, no whitespace
fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(Error::invalid_input("email is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(Error::invalid_input("email must not contain whitespace"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::invalid_input("email must contain '@'"));
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok {
        return Err(Error::invalid_input("email is not a valid address"));
    }
    Ok(())
}

fn normalize_name(name: Option<String>) -> Result<Option<String>> {
    match name {
        None => Ok(None),
        Some(name) => {
            let trimmed = name.trim();
            if trimmed.chars().count() < MIN_NAME_LENGTH {
                return Err(Error::invalid_input(format!(
                    "name must be at least {} characters",
                    MIN_NAME_LENGTH
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}
