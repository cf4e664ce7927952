//! Pravo CLI - account registration, login and token inspection
//!
//! Wires the authentication engine to a SQLite database and exposes its
//! operations as commands.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pravo_auth::{AuthConfig, AuthService, Database, SqliteUserStore};

#[derive(Parser)]
#[command(name = "pravo")]
#[command(author, version, about = "Account and bearer token CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override database path (or set PRAVO_DB_PATH env var)
    #[arg(long, env = "PRAVO_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Token signing secret
    #[arg(long, env = "PRAVO_JWT_SECRET", global = true, hide_env_values = true)]
    secret: Option<String>,

    /// Token lifetime in hours
    #[arg(long, env = "PRAVO_TOKEN_TTL_HOURS", global = true, default_value_t = 24)]
    token_ttl_hours: u64,

    /// Minimum accepted password length
    #[arg(long, env = "PRAVO_MIN_PASSWORD_LENGTH", global = true, default_value_t = 6)]
    min_password_length: usize,

    /// bcrypt work factor
    #[arg(long, env = "PRAVO_BCRYPT_COST", global = true, default_value_t = 12)]
    bcrypt_cost: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "PRAVO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Log in and print a bearer token
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "PRAVO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Inspect bearer tokens
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },

    /// Manage stored accounts
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
}

impl Cli {
    fn auth_config(&self) -> Result<AuthConfig> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No signing secret: pass --secret or set PRAVO_JWT_SECRET"))?;

        let config = AuthConfig::new(secret)?
            .with_token_ttl_hours(self.token_ttl_hours)?
            .with_min_password_length(self.min_password_length)
            .with_bcrypt_cost(self.bcrypt_cost);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<pravo_auth::Error>() {
            // Operator-side failures keep their cause
            Some(auth_err @ (pravo_auth::Error::Config(_) | pravo_auth::Error::Io(_))) => {
                output::print_error(&format!("Error ({}): {:#}", auth_err.http_status(), err))
            }
            Some(auth_err) => output::print_error(&format!(
                "Error ({}): {}",
                auth_err.http_status(),
                auth_err.public_message()
            )),
            None => output::print_error(&format!("Error: {:#}", err)),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.auth_config()?;
    log::debug!("Loaded {:?}", config);

    // Initialize database
    let db = match &cli.db {
        Some(path) => Database::open(path.clone()).await?,
        None => Database::new().await?,
    };
    let store = Arc::new(SqliteUserStore::new(db.pool.clone()));
    let service = AuthService::new(store, config)?;

    // Create context for commands
    let ctx = commands::Context {
        service,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Register {
            email,
            password,
            name,
        } => commands::session::register(&ctx, email, password, name).await,
        Commands::Login { email, password } => {
            commands::session::login(&ctx, email, password).await
        }
        Commands::Token { action } => commands::token::execute(&ctx, action).await,
        Commands::Account { action } => commands::account::execute(&ctx, action).await,
    }
}
