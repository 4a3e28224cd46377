use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod campaign;
mod config;
mod db;
mod error;
mod models;
mod ranking;
mod report;
mod snapshot;

use config::AppConfig;
use models::CommunityMetric;
use ranking::SortKey;

#[derive(Parser)]
#[command(name = "community-rankings")]
#[command(about = "Meme community leaderboard and campaign mindshare rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample communities
    Seed,
    /// Import communities from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the community leaderboard
    Rank {
        /// win-rate, volume, signals or members
        #[arg(long, default_value = "win-rate")]
        sort: SortKey,
        #[arg(long)]
        limit: Option<usize>,
        /// Rank a CSV snapshot instead of the database
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the campaign mindshare grid
    Campaign {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Seed for the mindshare drift, for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "win-rate")]
        sort: SortKey,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect(&config).await?;
            let upserted = db::import_csv(&pool, &csv).await?;
            println!("Upserted {upserted} communities from {}.", csv.display());
        }
        Commands::Rank {
            sort,
            limit,
            csv,
            json,
        } => {
            let metrics = load_metrics(&config, csv.as_deref()).await?;
            let ranked = ranking::rank(&metrics, sort);
            let window = limit.unwrap_or(config.leaderboard_window);
            info!(communities = ranked.len(), sort = sort.label(), "ranked communities");

            if json {
                let top: Vec<_> = ranked.iter().take(window).collect();
                println!("{}", serde_json::to_string_pretty(&top)?);
                return Ok(());
            }

            if ranked.is_empty() {
                println!("No communities available.");
                return Ok(());
            }

            println!("Top communities by {}:", sort.label());
            for entry in ranked.iter().take(window) {
                println!("- {}", report::leaderboard_line(entry));
            }
        }
        Commands::Campaign { limit, csv, seed } => {
            let window = limit.unwrap_or(config.campaign_window);
            let metrics = match csv.as_deref() {
                Some(path) => snapshot::load_csv(path)?,
                None => {
                    let pool = connect(&config).await?;
                    or_empty(db::fetch_campaign_communities(&pool, window).await)
                }
            };
            let grid = campaign::build_grid(&metrics, window, &mut campaign_rng(seed));

            if grid.is_empty() {
                println!("No communities in the campaign window.");
                return Ok(());
            }

            println!("Campaign mindshare:");
            for entry in grid.iter() {
                println!("- {}", report::campaign_line(entry));
            }
        }
        Commands::Report {
            sort,
            csv,
            seed,
            out,
        } => {
            let metrics = load_metrics(&config, csv.as_deref()).await?;
            let grid = campaign::build_grid(&metrics, config.campaign_window, &mut campaign_rng(seed));
            let report = report::build_report(
                &metrics,
                sort,
                config.leaderboard_window,
                &grid,
                chrono::Utc::now(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let database_url = config.require_database_url()?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

/// Reads a CSV snapshot when given, otherwise the communities table.
async fn load_metrics(
    config: &AppConfig,
    csv: Option<&Path>,
) -> anyhow::Result<Vec<CommunityMetric>> {
    if let Some(path) = csv {
        return snapshot::load_csv(path);
    }

    let pool = connect(config).await?;
    Ok(or_empty(db::fetch_communities(&pool).await))
}

/// Degrades a failed community fetch to an empty list.
fn or_empty(fetched: anyhow::Result<Vec<CommunityMetric>>) -> Vec<CommunityMetric> {
    fetched.unwrap_or_else(|err| {
        warn!("community fetch failed, continuing with no communities: {err:#}");
        Vec::new()
    })
}

fn campaign_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
