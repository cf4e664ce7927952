//! Operator commands for stored accounts

use anyhow::{bail, Result};
use clap::Subcommand;
use pravo_auth::UserStore;

use super::{AccountRow, Context};
use crate::output::{print_single, print_success};

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show a stored account
    Show {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Block an account from logging in
    Deactivate {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Allow a deactivated account to log in again
    Activate {
        /// Account email
        #[arg(long)]
        email: String,
    },
}

pub async fn execute(ctx: &Context, action: AccountAction) -> Result<()> {
    match action {
        AccountAction::Show { email } => show(ctx, &email).await,
        AccountAction::Deactivate { email } => set_active(ctx, &email, false).await,
        AccountAction::Activate { email } => set_active(ctx, &email, true).await,
    }
}

async fn show(ctx: &Context, email: &str) -> Result<()> {
    match ctx.service.store().find_by_email(email).await? {
        Some(account) => print_single(&AccountRow::from(&account), ctx.format),
        None => bail!("No account for {}", email),
    }
}

async fn set_active(ctx: &Context, email: &str, active: bool) -> Result<()> {
    if !ctx.service.store().set_active(email, active).await? {
        bail!("No account for {}", email);
    }

    let verb = if active { "Activated" } else { "Deactivated" };
    log::info!("{} account via CLI", verb);
    print_success(&format!("{} {}", verb, email), ctx.quiet);
    Ok(())
}
