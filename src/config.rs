use std::env;

use anyhow::Context;

use crate::campaign::DEFAULT_CAMPAIGN_WINDOW;

pub const DEFAULT_LEADERBOARD_WINDOW: usize = 20;

/// Settings read from the environment; CLI flags override the windows.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub leaderboard_window: usize,
    pub campaign_window: usize,
}

fn env_str(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_str(name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env_str("DATABASE_URL"),
            max_connections: env_parse("RANKINGS_DB_MAX_CONNECTIONS", 5),
            leaderboard_window: env_parse("RANKINGS_LEADERBOARD_WINDOW", DEFAULT_LEADERBOARD_WINDOW),
            campaign_window: env_parse("RANKINGS_CAMPAIGN_WINDOW", DEFAULT_CAMPAIGN_WINDOW),
        }
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to the Postgres instance holding the communities table")
    }
}
