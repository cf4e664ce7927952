//! Token inspection commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::{format_unix, AccountRow, Context};
use crate::output::print_single;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Verify a bearer token and show its claims
    Verify {
        /// The bearer token
        token: String,
    },

    /// Show the account a bearer token belongs to
    Whoami {
        /// The bearer token
        token: String,
    },
}

/// Claims row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ClaimsRow {
    #[tabled(rename = "User ID")]
    pub user_id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Expires")]
    pub expires: String,
    #[tabled(skip)]
    pub exp: i64,
}

pub async fn execute(ctx: &Context, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Verify { token } => verify(ctx, &token),
        TokenAction::Whoami { token } => whoami(ctx, &token).await,
    }
}

fn verify(ctx: &Context, token: &str) -> Result<()> {
    let claims = ctx.service.authenticate(token)?;
    let row = ClaimsRow {
        expires: format_unix(claims.exp),
        user_id: claims.user_id,
        email: claims.email,
        exp: claims.exp,
    };
    print_single(&row, ctx.format)
}

async fn whoami(ctx: &Context, token: &str) -> Result<()> {
    let account = ctx.service.current_account(token).await?;
    print_single(&AccountRow::from(&account), ctx.format)
}
