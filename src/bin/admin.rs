//! CLI administration tool for the URL shortener core.
//!
//! Runs the core operations directly against PostgreSQL, without any HTTP
//! layer in between.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL, expiring in a week
//! cargo run --bin admin -- link create https://example.com/docs --ttl-days 7
//!
//! # Resolve a code, optionally recording the visit
//! cargo run --bin admin -- link resolve Ab3_x9Zq --record
//!
//! # Expire a link immediately
//! cargo run --bin admin -- link expire Ab3_x9Zq
//!
//! # Click summary
//! cargo run --bin admin -- stats Ab3_x9Zq --json
//!
//! # Database checks
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! See [`url_shortener_core::config`]. `DATABASE_URL` (or the `DB_*`
//! components) is required.

use url_shortener_core::application::geo_fence::GeoFence;
use url_shortener_core::application::rate_limiter::RateLimiter;
use url_shortener_core::application::services::{
    AnalyticsAggregator, ClickRecorder, ShortenerService, Summary,
};
use url_shortener_core::config::{self, Config};
use url_shortener_core::domain::geo::{GeoLocator, NullGeoLocator};
use url_shortener_core::infrastructure::geo::MaxMindGeoLocator;
use url_shortener_core::infrastructure::persistence::{
    MIGRATOR, PgClickRepository, PgLinkRepository,
};
use url_shortener_core::logging;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Rate-limit key used for operations issued from this tool.
const ADMIN_CLIENT: &str = "admin-cli";

/// CLI tool for managing short links.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show the click summary of a link
    Stats {
        /// Short code
        code: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Destination URL
        url: String,

        /// Lifetime in days; the link never expires when omitted
        #[arg(long)]
        ttl_days: Option<i64>,
    },

    /// Resolve a short code to its destination
    Resolve {
        code: String,

        /// Record the resolution as a click
        #[arg(long)]
        record: bool,

        /// Client address used for rate limiting, geo fencing and the recorded click
        #[arg(long, default_value = "127.0.0.1")]
        client_address: String,

        /// User-Agent attached to the recorded click
        #[arg(long, default_value = "")]
        user_agent: String,
    },

    /// Force a link to expire now
    Expire {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    logging::init(&config.log_level, &config.log_format)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Stats { code, json } => handle_stats(&code, json, &config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn shortener(config: &Config, pool: &PgPool) -> ShortenerService<PgLinkRepository> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let create_limiter = Arc::new(RateLimiter::new(config.create_rate()));
    let resolve_limiter = Arc::new(RateLimiter::new(config.resolve_rate()));

    let mut service = ShortenerService::new(repo, create_limiter, resolve_limiter);
    if let Some(timeout) = config.store_timeout() {
        service = service.with_store_timeout(timeout);
    }

    if !config.restricted_countries.is_empty() {
        let mut fence = GeoFence::new(geo_locator(config), &config.restricted_countries);
        if let Some(timeout) = config.geo_timeout() {
            fence = fence.with_lookup_timeout(timeout);
        }
        service = service.with_geo_fence(Arc::new(fence));
    }

    service
}

/// Converts `--ttl-days` into a lifetime, rejecting values chrono cannot represent.
fn ttl_from_days(days: Option<i64>) -> Result<Option<chrono::Duration>> {
    days.map(|d| {
        chrono::Duration::try_days(d).with_context(|| format!("--ttl-days {d} is out of range"))
    })
    .transpose()
}

/// Falls back to [`NullGeoLocator`] when no database is configured or it
/// fails to open.
fn geo_locator(config: &Config) -> Arc<dyn GeoLocator> {
    let Some(ref path) = config.geoip_db_path else {
        return Arc::new(NullGeoLocator);
    };

    match MaxMindGeoLocator::open(path) {
        Ok(locator) => Arc::new(locator),
        Err(e) => {
            tracing::warn!(error = %e, "GeoIP disabled");
            Arc::new(NullGeoLocator)
        }
    }
}

async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let service = shortener(config, pool);

    match action {
        LinkAction::Create { url, ttl_days } => {
            let ttl = ttl_from_days(ttl_days)?;
            let link = service.create_short_link(ADMIN_CLIENT, &url, ttl).await?;

            println!("{}", "✅ Short link created".green().bold());
            println!();
            println!("  Code:        {}", link.code.bright_yellow().bold());
            println!("  Destination: {}", link.long_url.cyan());
            match link.expires_at {
                Some(at) => println!("  Expires:     {}", at.format("%Y-%m-%d %H:%M UTC")),
                None => println!("  Expires:     {}", "never".bright_black()),
            }
            println!();
        }
        LinkAction::Resolve {
            code,
            record,
            client_address,
            user_agent,
        } => {
            let link = service.resolve_short_link(&client_address, &code).await?;
            println!("{} → {}", link.code.bright_yellow(), link.long_url.cyan());

            if record {
                let click_repo = Arc::new(PgClickRepository::new(Arc::new(pool.clone())));
                let mut recorder = ClickRecorder::new(click_repo, geo_locator(config));
                if let Some(timeout) = config.geo_timeout() {
                    recorder = recorder.with_geo_timeout(timeout);
                }
                if let Some(timeout) = config.store_timeout() {
                    recorder = recorder.with_store_timeout(timeout);
                }

                let click = recorder
                    .record(link.id, &client_address, &user_agent, Utc::now())
                    .await?;
                println!(
                    "  Recorded click {} ({}, {})",
                    click.id.to_string().bright_black(),
                    click.device_type,
                    click.country_code.as_deref().unwrap_or("unknown country")
                );
            }
        }
        LinkAction::Expire { code, yes } => {
            let link = service.find_link(&code).await?;

            println!("  Code:        {}", link.code.bright_yellow());
            println!("  Destination: {}", link.long_url.cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Expire this link?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            service.force_expire(&code).await?;
            println!("{}", "✅ Link expired".green().bold());
        }
    }

    Ok(())
}

async fn handle_stats(code: &str, json: bool, config: &Config, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let mut aggregator = AnalyticsAggregator::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgClickRepository::new(pool)),
    );
    if let Some(timeout) = config.store_timeout() {
        aggregator = aggregator.with_store_timeout(timeout);
    }

    let summary = aggregator.summarize_code(code).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(code, &summary);
    }

    Ok(())
}

/// Renders a summary as a colored report.
///
/// ```text
/// 📊 Statistics for Ab3_x9Zq
///
///   Total clicks: 3
///
///   Devices
///     mobile      1
///     desktop     2
///
///   Top countries
///     Australia (AU)          2
/// ```
fn print_summary(code: &str, summary: &Summary) {
    println!("{} {}", "📊 Statistics for".bright_blue().bold(), code.bright_yellow());
    println!();
    println!(
        "  Total clicks: {}",
        summary.total_clicks.to_string().bright_green().bold()
    );

    if summary.total_clicks == 0 {
        println!();
        return;
    }

    println!();
    println!("  {}", "Devices".bright_white().bold());
    for (device, count) in &summary.counts_by_device {
        println!("    {:<10} {}", device.to_string(), count);
    }

    if !summary.counts_by_country.is_empty() {
        println!();
        println!("  {}", "Top countries".bright_white().bold());
        for entry in &summary.counts_by_country {
            let label = format!(
                "{} ({})",
                entry.country.as_deref().unwrap_or("?"),
                entry.country_code.as_deref().unwrap_or("?")
            );
            println!("    {:<24} {}", label.cyan(), entry.count);
        }
    }

    println!();
    println!("  {}", "Recent clicks".bright_white().bold());
    println!("  {}", "─".repeat(60).bright_black());
    for event in &summary.recent_events {
        println!(
            "    {}  {:<8} {:<4} {}",
            event
                .occurred_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            event.device_type.to_string(),
            event.country_code.as_deref().unwrap_or("-"),
            event.client_address
        );
    }
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());

            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .context("Schema missing, run `admin db migrate`")?;
            let clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
                .fetch_one(pool)
                .await?;

            println!("  Links:  {}", links.to_string().bright_green().bold());
            println!("  Clicks: {}", clicks.to_string().bright_green().bold());
        }
        DbAction::Migrate => {
            MIGRATOR
                .run(pool)
                .await
                .context("Failed to apply migrations")?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
