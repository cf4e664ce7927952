//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod account;
pub mod session;
pub mod token;

use chrono::{TimeZone, Utc};
use pravo_auth::{Account, AuthService, SqliteUserStore};
use serde::Serialize;
use tabled::Tabled;

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub service: AuthService<SqliteUserStore>,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Account row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Active")]
    pub is_active: bool,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            name: account.name.clone().unwrap_or_else(|| "-".to_string()),
            is_active: account.is_active,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Render a Unix timestamp for humans, falling back to the raw number
pub fn format_unix(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.to_rfc3339(),
        None => ts.to_string(),
    }
}
