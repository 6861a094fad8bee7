//! CLI administration tool for link-shortener.
//!
//! Provides commands for managing accounts, purging expired token
//! revocations and inspecting the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Delete an account with all its links and clicks
//! cargo run --bin admin -- user delete alice@example.com
//!
//! # Drop blacklist entries whose tokens have expired anyway
//! cargo run --bin admin -- tokens purge
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same configuration as the server (see `link_shortener::config`).

use link_shortener::config;
use link_shortener::domain::repositories::UserRepository;
use link_shortener::infrastructure::persistence::{PgTokenBlacklist, PgUserRepository};
use link_shortener::server::connect_pool;
use link_shortener::state::{AppState, Repositories, StateSettings};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Maintain the token blacklist
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List all accounts
    List,

    /// Delete an account together with its links and clicks
    Delete {
        /// Email of the account
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Token blacklist subcommands.
#[derive(Subcommand)]
enum TokensAction {
    /// Remove revocations of tokens that are past their expiry
    Purge,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::User { action } => handle_user_action(action, pool, &config).await?,
        Commands::Tokens { action } => handle_tokens_action(action, pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account commands.
async fn handle_user_action(
    action: UserAction,
    pool: Arc<PgPool>,
    config: &config::Config,
) -> Result<()> {
    match action {
        UserAction::List => list_users(PgUserRepository::new(pool)).await,
        UserAction::Delete { email, yes } => delete_user(pool, config, &email, yes).await,
    }
}

/// Lists accounts in registration order.
///
/// # Output Format
///
/// ```text
/// Users
///
///   ID  Username             Email                          Created
///   ────────────────────────────────────────────────────────────────────────
///   1   alice                alice@example.com              2025-01-15 10:30
///   2   bob                  bob@example.com                2025-01-16 14:20
/// ```
async fn list_users(repo: PgUserRepository) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<30} {:<16}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(72).bright_black());

    for user in &users {
        println!(
            "  {:<4} {:<20} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes an account through the same cascade the API uses.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is passed
async fn delete_user(
    pool: Arc<PgPool>,
    config: &config::Config,
    email: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete User".bright_blue().bold());
    println!();

    let repos = Repositories::postgres(pool, config.token_blacklist);
    let user = repos
        .users
        .find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("  User:  {}", user.username.cyan());
    println!("  Email: {}", user.email);
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this user and all of their links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let state = AppState::new(repos, StateSettings::from(config));
    let summary = state
        .user_service
        .delete_account(user.id, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    println!();
    println!("{}", "✅ User deleted".green().bold());
    println!(
        "  Removed {} links and {} clicks",
        summary.links.to_string().bright_white(),
        summary.clicks.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Dispatches token blacklist commands.
async fn handle_tokens_action(action: TokensAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        TokensAction::Purge => {
            let blacklist = PgTokenBlacklist::new(pool);
            let removed = blacklist
                .purge_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to purge blacklist: {}", e))?;

            println!(
                "{} {}",
                "✅ Purged expired revocations:".green().bold(),
                removed.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Number of accounts
/// - Total number of links
/// - Total number of recorded clicks
/// - Revoked tokens that have not expired yet
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    let revoked_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE expires_at > NOW()")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:          {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:          {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:         {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Revoked tokens: {}",
        revoked_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
