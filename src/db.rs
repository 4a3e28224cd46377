use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::CommunityMetric;
use crate::snapshot;

const SELECT_COMMUNITIES: &str = "SELECT id, name, avatar_url, member_count, \
     win_rate_10m, win_rate_1h, win_rate_24h, signal_count_24h, trading_volume, top_tokens \
     FROM meme_rankings.communities \
     ORDER BY win_rate_24h DESC";

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let communities = vec![
        (
            Uuid::parse_str("8b1e4c2a-6f3d-4a9e-b7c5-1d2e3f4a5b6c")?,
            "币圈猎狗群",
            "https://api.dicebear.com/7.x/avataaars/svg?seed=crypto1",
            (18_420_i64, 68.5, 72.1, 81.3, 4_820_i64, 12_400_000.0),
            vec!["PEPE", "WIF", "BONK"],
        ),
        (
            Uuid::parse_str("e4a7d9c3-2b5f-4e81-9a6c-7f0b3d2e1c48")?,
            "DeFi先锋DAO",
            "https://api.dicebear.com/7.x/avataaars/svg?seed=defi",
            (9_310, 59.0, 63.4, 77.9, 2_150, 6_750_000.0),
            vec!["DOGE", "PEPE"],
        ),
        (
            Uuid::parse_str("5c9f2e71-8d4a-4b36-a1e2-c3f4d5b6a790")?,
            "APE冲浪队",
            "https://api.dicebear.com/7.x/avataaars/svg?seed=ape",
            (12_055, 71.2, 66.0, 77.9, 6_300, 3_100_000.0),
            vec!["APE", "SHIB", "FLOKI"],
        ),
    ];

    for (id, name, avatar_url, stats, tokens) in communities {
        let (members, win_10m, win_1h, win_24h, signals, volume) = stats;
        let tokens: Vec<String> = tokens.into_iter().map(str::to_string).collect();
        let metric = CommunityMetric {
            id,
            name: name.to_string(),
            avatar_url: avatar_url.to_string(),
            member_count: members,
            win_rate_10m: win_10m,
            win_rate_1h: win_1h,
            win_rate_24h: win_24h,
            signal_count_24h: signals,
            trading_volume: volume,
            top_tokens: tokens,
        };
        upsert_community(pool, &metric).await?;
    }

    Ok(())
}

/// Inserts or refreshes a community keyed on its name. Returns true when a row changed.
pub async fn upsert_community(pool: &PgPool, metric: &CommunityMetric) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO meme_rankings.communities
        (id, name, avatar_url, member_count, win_rate_10m, win_rate_1h, win_rate_24h,
         signal_count_24h, trading_volume, top_tokens, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (name) DO UPDATE
        SET avatar_url = EXCLUDED.avatar_url,
            member_count = EXCLUDED.member_count,
            win_rate_10m = EXCLUDED.win_rate_10m,
            win_rate_1h = EXCLUDED.win_rate_1h,
            win_rate_24h = EXCLUDED.win_rate_24h,
            signal_count_24h = EXCLUDED.signal_count_24h,
            trading_volume = EXCLUDED.trading_volume,
            top_tokens = EXCLUDED.top_tokens,
            updated_at = now()
        "#,
    )
    .bind(metric.id)
    .bind(&metric.name)
    .bind(&metric.avatar_url)
    .bind(metric.member_count)
    .bind(metric.win_rate_10m)
    .bind(metric.win_rate_1h)
    .bind(metric.win_rate_24h)
    .bind(metric.signal_count_24h)
    .bind(metric.trading_volume)
    .bind(&metric.top_tokens)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All communities, best 24h win rate first.
pub async fn fetch_communities(pool: &PgPool) -> anyhow::Result<Vec<CommunityMetric>> {
    let rows = sqlx::query(SELECT_COMMUNITIES).fetch_all(pool).await?;
    tracing::debug!(count = rows.len(), "fetched communities");
    Ok(rows.iter().map(community_from_row).collect())
}

pub async fn fetch_campaign_communities(
    pool: &PgPool,
    limit: usize,
) -> anyhow::Result<Vec<CommunityMetric>> {
    let query = format!("{SELECT_COMMUNITIES} LIMIT $1");
    let rows = sqlx::query(&query)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(community_from_row).collect())
}

fn community_from_row(row: &sqlx::postgres::PgRow) -> CommunityMetric {
    CommunityMetric {
        id: row.get("id"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        member_count: row.get("member_count"),
        win_rate_10m: row.get("win_rate_10m"),
        win_rate_1h: row.get("win_rate_1h"),
        win_rate_24h: row.get("win_rate_24h"),
        signal_count_24h: row.get("signal_count_24h"),
        trading_volume: row.get("trading_volume"),
        top_tokens: row.get("top_tokens"),
    }
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut upserted = 0usize;

    for row in snapshot::read_rows(csv_path)? {
        let metric = row.into_metric();
        if upsert_community(pool, &metric).await? {
            upserted += 1;
        }
    }

    Ok(upserted)
}
