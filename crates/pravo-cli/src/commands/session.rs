//! Registration and login commands

use anyhow::Result;
use pravo_auth::{LoginRequest, RegisterRequest, TokenResponse};
use serde::Serialize;
use tabled::Tabled;

use super::{AccountRow, Context};
use crate::output::{print_success, print_with_token};

/// Token row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct TokenRow {
    #[tabled(rename = "Access Token")]
    pub access_token: String,
    #[tabled(rename = "Type")]
    pub token_type: String,
    #[tabled(rename = "Expires In (s)")]
    pub expires_in: i64,
}

impl From<TokenResponse> for TokenRow {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}

/// Create an account and print it with a fresh token
pub async fn register(
    ctx: &Context,
    email: String,
    password: String,
    name: Option<String>,
) -> Result<()> {
    let account = ctx
        .service
        .register(RegisterRequest {
            email,
            password,
            name,
        })
        .await?;
    let token = ctx.service.issue_token(&account);

    print_success(&format!("Registered {}", account.email), ctx.quiet);
    print_with_token(&AccountRow::from(&account), &TokenRow::from(token), ctx.format)
}

/// Check credentials and print the issued token
pub async fn login(ctx: &Context, email: String, password: String) -> Result<()> {
    let response = ctx.service.login(LoginRequest { email, password }).await?;

    print_success("Login successful", ctx.quiet);
    print_with_token(
        &AccountRow::from(&response.account),
        &TokenRow::from(response.token),
        ctx.format,
    )
}
