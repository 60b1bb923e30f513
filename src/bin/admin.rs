//! CLI administration tool for tiered-shortener.
//!
//! Provides commands for inspecting and removing mappings, viewing visit
//! statistics, and checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Print the short code a URL maps to
//! cargo run --bin admin -- derive https://example.com/a
//!
//! # Delete a mapping from both tiers
//! cargo run --bin admin -- delete aB3dE9z
//!
//! # View statistics
//! cargo run --bin admin -- stats --top 10
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! (or `REDIS_*`) enables cache invalidation on delete.

use tiered_shortener::application::services::LinkService;
use tiered_shortener::config::{self, Config};
use tiered_shortener::domain::repositories::VisitRepository;
use tiered_shortener::infrastructure::persistence::{PgMappingStore, PgVisitRepository};
use tiered_shortener::server::{connect_cache, connect_pool};
use tiered_shortener::utils::code_generator::{derive_code, is_valid_code};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tiered-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the short code derived from a URL
    Derive {
        /// Target URL
        url: String,
    },

    /// Delete a mapping from the durable tier and the cache
    Delete {
        /// Short code to delete
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats {
        /// Number of most visited codes to list
        #[arg(long, default_value_t = 10)]
        top: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Deriving a code needs no backing services.
    if let Commands::Derive { url } = &cli.command {
        println!("{}", derive_code(url).bright_green().bold());
        return Ok(());
    }

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Derive { .. } => {}
        Commands::Delete { code, yes } => handle_delete(&config, pool, code, yes).await?,
        Commands::Stats { top } => handle_stats(pool, top).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Deletes a mapping after confirmation.
///
/// The durable row is removed first; the cache entry is invalidated
/// afterwards so the code stops resolving on either tier.
async fn handle_delete(config: &Config, pool: PgPool, code: String, yes: bool) -> Result<()> {
    if !is_valid_code(&code) {
        anyhow::bail!("'{}' is not a valid short code", code);
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete short code {}?", code.bright_white().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let cache = connect_cache(config).await;
    let store = Arc::new(PgMappingStore::new(Arc::new(pool)));
    let service = LinkService::new(
        cache,
        store,
        config.resolve_timeout(),
        config.collision_policy,
    );

    if service.delete(&code).await? {
        println!("{} {}", "Deleted".green().bold(), code);
    } else {
        println!("{} {}", "No mapping for".yellow(), code);
    }

    Ok(())
}

/// Displays mapping and visit totals plus the most visited codes.
async fn handle_stats(pool: PgPool, top: i64) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let mappings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(&pool)
        .await?;

    let visits_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM page_visits")
        .fetch_one(&pool)
        .await?;

    println!(
        "  Mappings: {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:   {}",
        visits_count.to_string().bright_green().bold()
    );
    println!();

    let repository = PgVisitRepository::new(Arc::new(pool));
    let tallies = repository.top_visited(top).await?;

    if tallies.is_empty() {
        println!("{}", "  No visits recorded yet".dimmed());
    } else {
        println!("{}", "  Most visited:".bright_blue());
        for tally in tallies {
            println!(
                "    {}  {}",
                tally.short_code.bright_white(),
                tally.total.to_string().bright_green()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
