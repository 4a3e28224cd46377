use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::CommunityMetric;

/// A community row as it appears in CSV exports of the communities table.
#[derive(Debug, Deserialize)]
pub struct CsvCommunity {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    pub member_count: i64,
    pub win_rate_10m: f64,
    pub win_rate_1h: f64,
    pub win_rate_24h: f64,
    pub signal_count_24h: i64,
    pub trading_volume: f64,
    #[serde(default)]
    pub top_tokens: String,
}

impl CsvCommunity {
    pub fn into_metric(self) -> CommunityMetric {
        CommunityMetric {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            top_tokens: split_tokens(&self.top_tokens),
            name: self.name,
            avatar_url: self.avatar_url,
            member_count: self.member_count,
            win_rate_10m: self.win_rate_10m,
            win_rate_1h: self.win_rate_1h,
            win_rate_24h: self.win_rate_24h,
            signal_count_24h: self.signal_count_24h,
            trading_volume: self.trading_volume,
        }
    }
}

pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_rows(csv_path: &Path) -> anyhow::Result<Vec<CsvCommunity>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<CsvCommunity>().enumerate() {
        let row = result.with_context(|| format!("invalid community on row {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Loads communities from a CSV snapshot, keeping file order as fetch order.
pub fn load_csv(csv_path: &Path) -> anyhow::Result<Vec<CommunityMetric>> {
    let metrics: Vec<CommunityMetric> = read_rows(csv_path)?
        .into_iter()
        .map(CsvCommunity::into_metric)
        .collect();
    tracing::debug!(count = metrics.len(), path = %csv_path.display(), "loaded snapshot");
    Ok(metrics)
}
