use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityMetric {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
    pub member_count: i64,
    pub win_rate_10m: f64,
    pub win_rate_1h: f64,
    pub win_rate_24h: f64,
    pub signal_count_24h: i64,
    pub trading_volume: f64,
    pub top_tokens: Vec<String>,
}

/// One community's position under the active sort key.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry<'a> {
    pub metric: &'a CommunityMetric,
    pub rank: usize,
    pub visual_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MindshareBand {
    Dominant,
    Strong,
    Rising,
    Emerging,
    Quiet,
}

impl MindshareBand {
    pub fn from_mindshare(mindshare: f64) -> Self {
        if mindshare > 0.8 {
            Self::Dominant
        } else if mindshare > 0.6 {
            Self::Strong
        } else if mindshare > 0.4 {
            Self::Rising
        } else if mindshare > 0.2 {
            Self::Emerging
        } else {
            Self::Quiet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dominant => "dominant",
            Self::Strong => "strong",
            Self::Rising => "rising",
            Self::Emerging => "emerging",
            Self::Quiet => "quiet",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignEntry<'a> {
    pub metric: &'a CommunityMetric,
    pub rank: usize,
    pub mindshare: f64,
    pub mindshare_change: f64,
    pub tile_size: f64,
    pub band: MindshareBand,
}
