use rand::Rng;

use crate::models::{CampaignEntry, CommunityMetric, MindshareBand};
use crate::ranking::{self, SortKey};

pub const DEFAULT_CAMPAIGN_WINDOW: usize = 25;
const MAX_MINDSHARE_DRIFT: f64 = 0.05;

/// Mindshare assigned to the community at `index` in win-rate order.
pub fn mindshare_for_index(index: usize) -> f64 {
    ((100.0 - index as f64 * 2.0) / 100.0).max(0.0)
}

/// Builds the campaign grid from the top `window` communities by 24h win rate.
pub fn build_grid<'a, R: Rng>(
    metrics: &'a [CommunityMetric],
    window: usize,
    rng: &mut R,
) -> Vec<CampaignEntry<'a>> {
    ranking::rank(metrics, SortKey::WinRate24h)
        .into_iter()
        .take(window)
        .enumerate()
        .map(|(index, entry)| {
            let mindshare = mindshare_for_index(index);
            CampaignEntry {
                metric: entry.metric,
                rank: entry.rank,
                mindshare,
                mindshare_change: rng.gen_range(-MAX_MINDSHARE_DRIFT..MAX_MINDSHARE_DRIFT),
                tile_size: ranking::mindshare_tile_size(mindshare),
                band: MindshareBand::from_mindshare(mindshare),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn community(name: &str, win_rate_24h: f64) -> CommunityMetric {
        CommunityMetric {
            id: Uuid::new_v4(),
            name: name.to_string(),
            avatar_url: String::new(),
            member_count: 100,
            win_rate_10m: 50.0,
            win_rate_1h: 50.0,
            win_rate_24h,
            signal_count_24h: 10,
            trading_volume: 1_000.0,
            top_tokens: vec!["PEPE".to_string()],
        }
    }

    #[test]
    fn mindshare_steps_down_by_two_points() {
        assert_eq!(mindshare_for_index(0), 1.0);
        assert!((mindshare_for_index(5) - 0.9).abs() < 1e-9);
        assert!((mindshare_for_index(24) - 0.52).abs() < 1e-9);
        assert_eq!(mindshare_for_index(50), 0.0);
        assert_eq!(mindshare_for_index(80), 0.0);
    }

    #[test]
    fn grid_follows_win_rate_and_window() {
        let metrics: Vec<CommunityMetric> = (0..30)
            .map(|i| community(&format!("c{i}"), i as f64))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let grid = build_grid(&metrics, DEFAULT_CAMPAIGN_WINDOW, &mut rng);
        assert_eq!(grid.len(), 25);
        assert_eq!(grid[0].metric.name, "c29");
        assert_eq!(grid[0].rank, 1);
        assert_eq!(grid[0].tile_size, 120.0);
        assert_eq!(grid[0].band, MindshareBand::Dominant);
        assert_eq!(grid[24].metric.name, "c5");
        assert_eq!(grid[24].band, MindshareBand::Rising);
    }

    #[test]
    fn drift_stays_in_range() {
        let metrics: Vec<CommunityMetric> = (0..10)
            .map(|i| community(&format!("c{i}"), 90.0 - i as f64))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);

        for entry in build_grid(&metrics, 25, &mut rng) {
            assert!(entry.mindshare_change >= -MAX_MINDSHARE_DRIFT);
            assert!(entry.mindshare_change < MAX_MINDSHARE_DRIFT);
        }
    }

    #[test]
    fn seeded_grids_match() {
        let metrics = vec![community("a", 70.0), community("b", 80.0)];
        let first = build_grid(&metrics, 25, &mut StdRng::seed_from_u64(1));
        let second = build_grid(&metrics, 25, &mut StdRng::seed_from_u64(1));
        let changes = |grid: &[CampaignEntry<'_>]| {
            grid.iter().map(|e| e.mindshare_change).collect::<Vec<_>>()
        };
        assert_eq!(changes(&first), changes(&second));
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(MindshareBand::from_mindshare(0.81), MindshareBand::Dominant);
        assert_eq!(MindshareBand::from_mindshare(0.8), MindshareBand::Strong);
        assert_eq!(MindshareBand::from_mindshare(0.5), MindshareBand::Rising);
        assert_eq!(MindshareBand::from_mindshare(0.3), MindshareBand::Emerging);
        assert_eq!(MindshareBand::from_mindshare(0.2), MindshareBand::Quiet);
    }

    #[test]
    fn empty_metrics_give_empty_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(build_grid(&[], 25, &mut rng).is_empty());
    }
}
