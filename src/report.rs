use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{CampaignEntry, CommunityMetric, RankedEntry};
use crate::ranking::{self, SortKey};

pub fn format_volume(volume: f64) -> String {
    format!("${:.1}M", volume / 1_000_000.0)
}

pub fn format_tokens(metric: &CommunityMetric) -> String {
    if metric.top_tokens.is_empty() {
        return "-".to_string();
    }
    metric
        .top_tokens
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn leaderboard_line(entry: &RankedEntry<'_>) -> String {
    let metric = entry.metric;
    format!(
        "#{} {} | win {:.1}% / {:.1}% / {:.1}% | {} signals | {} | {} members | weight {:.1}",
        entry.rank,
        metric.name,
        metric.win_rate_10m,
        metric.win_rate_1h,
        metric.win_rate_24h,
        metric.signal_count_24h,
        format_volume(metric.trading_volume),
        metric.member_count,
        entry.visual_weight
    )
}

pub fn campaign_line(entry: &CampaignEntry<'_>) -> String {
    format!(
        "#{} {} | mindshare {:.2}% ({:+.2}%) | {} | tile {:.0}",
        entry.rank,
        entry.metric.name,
        entry.mindshare * 100.0,
        entry.mindshare_change * 100.0,
        entry.band.label(),
        entry.tile_size
    )
}

pub fn build_report(
    metrics: &[CommunityMetric],
    key: SortKey,
    leaderboard_window: usize,
    grid: &[CampaignEntry<'_>],
    generated_at: DateTime<Utc>,
) -> String {
    let ranked = ranking::rank(metrics, key);

    let mut output = String::new();

    let _ = writeln!(output, "# Meme Community Leaderboard");
    let _ = writeln!(
        output,
        "Generated {} for {} communities, ranked by {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        metrics.len(),
        key.label()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Communities");

    if ranked.is_empty() {
        let _ = writeln!(output, "No communities available.");
    } else {
        for entry in ranked.iter().take(leaderboard_window) {
            let _ = writeln!(
                output,
                "- #{} {} (weight {:.1}): {:.1}% 1h win rate, {} signals, {}",
                entry.rank,
                entry.metric.name,
                entry.visual_weight,
                entry.metric.win_rate_1h,
                entry.metric.signal_count_24h,
                format_volume(entry.metric.trading_volume)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Community Rankings");

    if ranked.is_empty() {
        let _ = writeln!(output, "No communities available.");
    } else {
        let _ = writeln!(
            output,
            "| Rank | Community | 10m Win | 1h Win | 24h Win | Signals | Volume | Members | Top Tokens |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|");
        for entry in ranked.iter() {
            let metric = entry.metric;
            let _ = writeln!(
                output,
                "| {} | {} | {:.1}% | {:.1}% | {:.1}% | {} | {} | {} | {} |",
                entry.rank,
                metric.name,
                metric.win_rate_10m,
                metric.win_rate_1h,
                metric.win_rate_24h,
                metric.signal_count_24h,
                format_volume(metric.trading_volume),
                metric.member_count,
                format_tokens(metric)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Campaign Mindshare");

    if grid.is_empty() {
        let _ = writeln!(output, "No communities in the campaign window.");
    } else {
        for entry in grid.iter() {
            let _ = writeln!(output, "- {}", campaign_line(entry));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    use crate::campaign;

    fn community(name: &str, win_rate_24h: f64, trading_volume: f64) -> CommunityMetric {
        CommunityMetric {
            id: Uuid::new_v4(),
            name: name.to_string(),
            avatar_url: String::new(),
            member_count: 42,
            win_rate_10m: 40.0,
            win_rate_1h: 50.0,
            win_rate_24h,
            signal_count_24h: 2000,
            trading_volume,
            top_tokens: vec!["PEPE".into(), "WIF".into(), "BONK".into(), "DOGE".into()],
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn volume_is_shown_in_millions() {
        assert_eq!(format_volume(12_400_000.0), "$12.4M");
        assert_eq!(format_volume(0.0), "$0.0M");
    }

    #[test]
    fn tokens_are_capped_at_three() {
        let metric = community("a", 10.0, 0.0);
        assert_eq!(format_tokens(&metric), "PEPE, WIF, BONK");
    }

    #[test]
    fn report_lists_sections_in_rank_order() {
        let metrics = vec![
            community("Frog Hunters", 50.0, 100.0),
            community("Ape Surf Crew", 90.0, 3_000_000.0),
        ];
        let grid = campaign::build_grid(&metrics, 25, &mut StdRng::seed_from_u64(9));
        let report = build_report(&metrics, SortKey::WinRate24h, 20, &grid, generated_at());

        assert!(report.contains("Generated 2026-02-02 09:30 UTC for 2 communities, ranked by 24h win rate"));
        assert!(report.contains("- #1 Ape Surf Crew (weight 76.0)"));
        assert!(report.contains("| 2 | Frog Hunters |"));
        assert!(report.contains("## Campaign Mindshare"));
        let top = report.find("#1 Ape Surf Crew").unwrap();
        let second = report.find("#2 Frog Hunters").unwrap();
        assert!(top < second);
    }

    #[test]
    fn leaderboard_window_limits_top_section_only() {
        let metrics: Vec<CommunityMetric> = (0..5)
            .map(|i| community(&format!("c{i}"), i as f64, 0.0))
            .collect();
        let report = build_report(&metrics, SortKey::WinRate24h, 2, &[], generated_at());

        assert!(report.contains("- #2 c3"));
        assert!(!report.contains("- #3 c2"));
        assert!(report.contains("| 5 | c0 |"));
        assert!(report.contains("No communities in the campaign window."));
    }

    #[test]
    fn empty_report_still_renders() {
        let report = build_report(&[], SortKey::MemberCount, 20, &[], generated_at());
        assert!(report.contains("No communities available."));
    }
}
