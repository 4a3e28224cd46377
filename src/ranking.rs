use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::RankingError;
use crate::models::{CommunityMetric, RankedEntry};

pub const MIN_VISUAL_WEIGHT: f64 = 60.0;
pub const MAX_VISUAL_WEIGHT: f64 = 140.0;
/// Signal score at which the visual weight saturates.
pub const SATURATION_SCORE: f64 = 5000.0;

pub const MIN_TILE_SIZE: f64 = 60.0;
pub const TILE_SCALE: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    WinRate24h,
    TradingVolume,
    SignalCount24h,
    MemberCount,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WinRate24h => "24h win rate",
            Self::TradingVolume => "trading volume",
            Self::SignalCount24h => "24h signals",
            Self::MemberCount => "members",
        }
    }

    fn compare(&self, a: &CommunityMetric, b: &CommunityMetric) -> Ordering {
        match self {
            Self::WinRate24h => descending_f64(a.win_rate_24h, b.win_rate_24h),
            Self::TradingVolume => descending_f64(a.trading_volume, b.trading_volume),
            Self::SignalCount24h => b.signal_count_24h.cmp(&a.signal_count_24h),
            Self::MemberCount => b.member_count.cmp(&a.member_count),
        }
    }
}

impl FromStr for SortKey {
    type Err = RankingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "win-rate" | "win_rate" | "win-rate-24h" | "win_rate_24h" => Ok(Self::WinRate24h),
            "volume" | "trading-volume" | "trading_volume" => Ok(Self::TradingVolume),
            "signals" | "signal-count" | "signal_count_24h" => Ok(Self::SignalCount24h),
            "members" | "member-count" | "member_count" => Ok(Self::MemberCount),
            _ => Err(RankingError::UnknownSortKey(value.to_string())),
        }
    }
}

fn descending_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Orders every community descending by `key`, keeping input order on ties.
///
/// Ranks are 1-based and NaN values sort last, keeping their input order.
/// The weight of each entry depends only on its own signal count and 1h win
/// rate, never on the key or the position.
pub fn rank(metrics: &[CommunityMetric], key: SortKey) -> Vec<RankedEntry<'_>> {
    let mut ordered: Vec<&CommunityMetric> = metrics.iter().collect();
    ordered.sort_by(|a, b| key.compare(a, b));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, metric)| RankedEntry {
            metric,
            rank: index + 1,
            visual_weight: visual_weight(metric.signal_count_24h, metric.win_rate_1h),
        })
        .collect()
}

pub fn visual_weight(signal_count_24h: i64, win_rate_1h: f64) -> f64 {
    let score = signal_count_24h as f64 * (win_rate_1h / 100.0);
    let normalized = if score.is_nan() {
        0.0
    } else {
        (score / SATURATION_SCORE).min(1.0)
    };
    MIN_VISUAL_WEIGHT + (MAX_VISUAL_WEIGHT - MIN_VISUAL_WEIGHT) * normalized
}

/// Tile size for the campaign grid. `mindshare` arrives pre-normalized.
pub fn mindshare_tile_size(mindshare: f64) -> f64 {
    (mindshare * TILE_SCALE).max(MIN_TILE_SIZE)
}
