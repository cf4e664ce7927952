//! AuthService behaviour against the in-memory store

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{service_with, service_with_config, test_config, BarrierStore, SlowStore, NOW};
use chrono::Utc;
use pravo_auth::{
    Account, Error, InMemoryUserStore, LoginRequest, RegisterRequest, MAX_PASSWORD_BYTES,
};

fn register_req(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        name: None,
    }
}

fn login_req(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// register
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    let account = service
        .register(RegisterRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            name: Some("Anna".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(account.email, "a@x.com");
    assert_eq!(account.name.as_deref(), Some("Anna"));
    assert!(account.is_active);
    assert!(!account.id.is_empty());
    // Never the raw password
    assert_ne!(account.password_hash, "secret1");
    assert!(account.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    service.register(register_req("a@x.com", "secret1")).await.unwrap();

    let result = service.register(register_req("a@x.com", "other-pass")).await;
    assert!(matches!(result, Err(Error::AccountExists)));
}

#[tokio::test]
async fn test_register_email_is_case_sensitive() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    service.register(register_req("a@x.com", "secret1")).await.unwrap();

    assert!(service.register(register_req("A@x.com", "secret1")).await.is_ok());
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    let cases = [
        register_req("", "secret1"),
        register_req("not-an-email", "secret1"),
        register_req("a@x.com", ""),
        register_req("a@x.com", "short"),
        RegisterRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            name: Some(" ".to_string()),
        },
    ];
    for request in cases {
        let result = service.register(request.clone()).await;
        assert!(
            matches!(result, Err(Error::InvalidInput(_))),
            "{:?} should be rejected",
            request.email
        );
    }
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn test_register_min_password_length_is_configurable() {
    let config = test_config().with_min_password_length(10);
    let (service, _) = service_with_config(Arc::new(InMemoryUserStore::new()), config);

    let result = service.register(register_req("a@x.com", "secret123")).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(service.register(register_req("a@x.com", "secret1234")).await.is_ok());
}

#[tokio::test]
async fn test_register_rejects_password_over_bcrypt_limit() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    let too_long = "x".repeat(MAX_PASSWORD_BYTES + 1);
    let result = service.register(register_req("a@x.com", &too_long)).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(service.store().is_empty());

    let at_limit = "x".repeat(MAX_PASSWORD_BYTES);
    assert!(service.register(register_req("a@x.com", &at_limit)).await.is_ok());
}

#[tokio::test]
async fn test_login_with_shared_long_prefix_is_rejected() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    let prefix = "x".repeat(MAX_PASSWORD_BYTES);
    service.register(register_req("a@x.com", &prefix)).await.unwrap();

    let guess = format!("{}attacker-guess", prefix);
    let result = service.login(login_req("a@x.com", &guess)).await;
    assert!(matches!(result, Err(Error::InvalidCredentials)));

    assert!(service.login(login_req("a@x.com", &prefix)).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_register_exactly_one_wins() {
    let store = Arc::new(BarrierStore::new(InMemoryUserStore::new(), 2));
    let (service, _) = service_with(store.clone());

    let (first, second) = tokio::join!(
        service.register(register_req("race@x.com", "secret1")),
        service.register(register_req("race@x.com", "secret2")),
    );

    let outcomes = [first, second];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(Error::AccountExists)))
        .count();
    assert_eq!(wins, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(store.inner().len(), 1);
}

#[tokio::test]
async fn test_concurrent_register_many_tasks() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register(register_req("crowd@x.com", &format!("secret-{}", i)))
                    .await
            })
        })
        .collect();

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(Error::AccountExists) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(wins, 1);
}

// ============================================================================
// login
// ============================================================================

#[tokio::test]
async fn test_register_then_login_scenario() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    let account = service.register(register_req("a@x.com", "secret1")).await.unwrap();
    assert!(account.is_active);

    let response = service.login(login_req("a@x.com", "secret1")).await.unwrap();
    assert_eq!(response.account.id, account.id);
    assert_eq!(response.token.token_type, "bearer");
    assert_eq!(response.token.expires_in, 24 * 60 * 60);

    let wrong = service.login(login_req("a@x.com", "wrong")).await;
    assert!(matches!(wrong, Err(Error::InvalidCredentials)));

    let unknown = service.login(login_req("nouser@x.com", "anything")).await;
    assert!(matches!(unknown, Err(Error::InvalidCredentials)));
    assert_eq!(
        wrong.unwrap_err().to_string(),
        unknown.unwrap_err().to_string()
    );

    assert!(service.store().set_active("a@x.com", false));
    let inactive = service.login(login_req("a@x.com", "secret1")).await;
    assert!(matches!(inactive, Err(Error::AccountInactive)));
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));

    for (email, password) in [("", "secret1"), ("a@x.com", ""), ("", "")] {
        let result = service.login(login_req(email, password)).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}

#[tokio::test]
async fn test_login_token_valid_until_expiry() {
    let (service, clock) = service_with(Arc::new(InMemoryUserStore::new()));
    service.register(register_req("a@x.com", "secret1")).await.unwrap();

    let response = service.login(login_req("a@x.com", "secret1")).await.unwrap();
    let claims = service.authenticate(&response.token.access_token).unwrap();
    assert_eq!(claims.user_id, response.account.id);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.exp, NOW + 24 * 60 * 60);

    clock.set(claims.exp - 1);
    assert!(service.authenticate(&response.token.access_token).is_ok());

    clock.set(claims.exp);
    assert!(matches!(
        service.authenticate(&response.token.access_token),
        Err(Error::TokenExpired)
    ));
}

#[tokio::test]
async fn test_login_with_corrupt_stored_hash_is_internal() {
    let store = InMemoryUserStore::new().with_account(Account {
        id: "corrupt".to_string(),
        email: "b@x.com".to_string(),
        name: None,
        password_hash: "not-a-bcrypt-hash".to_string(),
        is_active: true,
        created_at: Utc::now(),
    });
    let (service, _) = service_with(Arc::new(store));

    let err = service.login(login_req("b@x.com", "secret1")).await.unwrap_err();
    assert!(matches!(err, Error::Hash(_)));
    assert_eq!(err.http_status(), 500);
    assert_eq!(err.public_message(), "Internal error");
}

// ============================================================================
// issue_token / current_account
// ============================================================================

#[tokio::test]
async fn test_issue_token_after_register() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    let account = service.register(register_req("a@x.com", "secret1")).await.unwrap();

    let token = service.issue_token(&account);
    let current = service.current_account(&token.access_token).await.unwrap();
    assert_eq!(current.id, account.id);
}

#[tokio::test]
async fn test_current_account_inactive() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    let account = service.register(register_req("a@x.com", "secret1")).await.unwrap();
    let token = service.issue_token(&account);

    service.store().set_active("a@x.com", false);
    let result = service.current_account(&token.access_token).await;
    assert!(matches!(result, Err(Error::AccountInactive)));
}

#[tokio::test]
async fn test_current_account_unknown_subject() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    let token = service.codec().issue("ghost", "ghost@x.com", Duration::from_secs(60));

    let result = service.current_account(&token).await;
    assert!(matches!(result, Err(Error::InvalidCredentials)));
}

#[tokio::test]
async fn test_current_account_rejects_tampered_token() {
    let (service, _) = service_with(Arc::new(InMemoryUserStore::new()));
    let account = service.register(register_req("a@x.com", "secret1")).await.unwrap();
    let token = service.issue_token(&account).access_token;

    let tampered = format!("{}x", token);
    let result = service.current_account(&tampered).await;
    assert!(matches!(result, Err(Error::InvalidSignature)));
}

// ============================================================================
// timeouts
// ============================================================================

#[tokio::test]
async fn test_store_timeout_surfaces_as_timeout() {
    let store = Arc::new(SlowStore {
        delay: Duration::from_millis(500),
    });
    let config = test_config().with_store_timeout(Duration::from_millis(20));
    let (service, _) = service_with_config(store, config);

    let err = service.login(login_req("a@x.com", "secret1")).await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert_eq!(err.http_status(), 504);

    let err = service.register(register_req("a@x.com", "secret1")).await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}
