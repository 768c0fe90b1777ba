//! CLI administration tool for url-shorter.
//!
//! Works directly against the configured storage backend, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a short code
//! cargo run --bin admin -- lookup Ab3_-xYz
//!
//! # List an owner's links
//! cargo run --bin admin -- user 7c1e4f0a-3b9d-4f7e-9a51-2d6c8e0b1f34
//!
//! # Soft-delete links on behalf of their owner
//! cargo run --bin admin -- delete 7c1e4f0a-... Ab3_-xYz Qw8-pL0_
//!
//! # Check storage
//! cargo run --bin admin -- db check
//! ```
//!
//! # Storage Selection
//!
//! Same rules as the server: `-d` / `DATABASE_DSN`, then `-f` /
//! `FILE_STORAGE_PATH`, then memory.

use url_shorter::config::{self, Config};
use url_shorter::domain::allocator::Allocator;
use url_shorter::domain::errors::RepositoryError;
use url_shorter::domain::repositories::UrlRepository;
use url_shorter::server::open_storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing url-shorter.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON storage file (overridden by FILE_STORAGE_PATH)
    #[arg(short = 'f', global = true, default_value = "/var/lib/url-shorter/short-url-db.json")]
    file_storage_path: String,

    /// PostgreSQL connection string (overridden by DATABASE_DSN)
    #[arg(short = 'd', global = true)]
    database_dsn: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the original URL behind a short code
    Lookup {
        code: String,
    },

    /// List every link owned by an owner id
    User {
        owner_id: String,
    },

    /// Soft-delete links owned by an owner id
    Delete {
        owner_id: String,

        #[arg(required = true)]
        codes: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Storage operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Storage operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check that storage is reachable and count records
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_cli_and_env(config::Cli {
        server_address: ":8080".to_string(),
        base_url: "http://localhost:8080".to_string(),
        file_storage_path: cli.file_storage_path,
        database_dsn: cli.database_dsn,
        audit_file: None,
        audit_url: None,
    })?;

    let storage = open_storage(&config)
        .await
        .context("Failed to open storage")?;

    let allocator = Allocator::new(storage)
        .await
        .context("Failed to load records")?;

    match cli.command {
        Commands::Lookup { code } => lookup(&allocator, &code).await?,
        Commands::User { owner_id } => list_user(&allocator, &owner_id, &config.base_url).await?,
        Commands::Delete {
            owner_id,
            codes,
            yes,
        } => delete(&allocator, &owner_id, codes, yes).await?,
        Commands::Db {
            action: DbAction::Check,
        } => db_check(&allocator).await?,
    }

    Ok(())
}

/// Prints the original URL for `code`, or why there is none.
async fn lookup(allocator: &Allocator, code: &str) -> Result<()> {
    println!("{}", "🔎 Lookup".bright_blue().bold());
    println!();

    match allocator.find(code).await {
        Ok(url) => {
            println!("  Code: {}", code.cyan());
            println!("  URL:  {}", url.bright_white());
            println!("  State: {}", "LIVE".green());
        }
        Err(RepositoryError::Deleted) => {
            println!("  Code: {}", code.cyan());
            println!("  State: {}", "DELETED".red());
        }
        Err(RepositoryError::NotFound) => {
            println!("{}", format!("  No link with code {code}").yellow());
        }
        Err(e) => return Err(anyhow::anyhow!("Storage error: {}", e)),
    }

    println!();
    Ok(())
}

/// Lists an owner's links with their state.
///
/// # Output Format
///
/// ```text
/// 📋 Links of 7c1e4f0a-...
///
///   Code      State    Original URL
///   ────────────────────────────────────────────────────────────
///   Ab3_-xYz  LIVE     https://example.com
///   Qw8-pL0_  DELETED  https://example.org
/// ```
async fn list_user(allocator: &Allocator, owner_id: &str, base_url: &str) -> Result<()> {
    println!("{} {}", "📋 Links of".bright_blue().bold(), owner_id.cyan());
    println!();

    let records = allocator
        .user_urls(owner_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<8} {}",
        "Code".bright_white().bold(),
        "State".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for record in &records {
        let state = if record.is_deleted {
            "DELETED".red()
        } else {
            "LIVE".green()
        };

        println!(
            "  {:<9} {:<8} {}",
            record.short_code.cyan(),
            state,
            record.original_url
        );
    }

    let live = records.iter().filter(|r| !r.is_deleted).count();
    println!();
    println!(
        "  Total: {} ({} live)",
        records.len().to_string().bright_white().bold(),
        live.to_string().green()
    );
    println!(
        "  Short URLs are served under {}",
        base_url.trim_end_matches('/').bright_black()
    );
    println!();

    Ok(())
}

/// Soft-deletes `codes` owned by `owner_id` after confirmation.
///
/// Codes owned by someone else are skipped silently, as on the HTTP path.
async fn delete(
    allocator: &Allocator,
    owner_id: &str,
    codes: Vec<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete links".bright_blue().bold());
    println!();
    println!("  Owner: {}", owner_id.cyan());
    println!("  Codes: {}", codes.join(", ").bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    allocator
        .delete_batch(&codes, owner_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete links: {}", e))?;

    println!();
    println!("{}", "✅ Delete applied".green().bold());
    println!();

    Ok(())
}

/// Pings storage and reports the record count.
async fn db_check(allocator: &Allocator) -> Result<()> {
    println!("{}", "🔌 Storage check".bright_blue().bold());
    println!();

    allocator
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Storage unreachable: {}", e))?;

    let records = allocator
        .storage()
        .load()
        .await
        .context("Failed to load records")?;
    let deleted = records.iter().filter(|r| r.is_deleted).count();

    println!("  Status:  {}", "OK".green().bold());
    println!(
        "  Records: {} ({} deleted)",
        records.len().to_string().bright_white().bold(),
        deleted.to_string().bright_black()
    );
    println!();

    Ok(())
}
