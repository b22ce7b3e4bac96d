// crates/db/src/queries/activity.rs
// Category distribution and top-community rankings.

use echo_break_core::{CategoryCount, CommunityCount, WindowDays};
use tracing::debug;

use super::window_cutoff;
use crate::error::QueryFailure;
use crate::Database;

pub const ACTIVITY_TABLE: &str = "user_activity";
pub const TOP_COMMUNITIES_LIMIT: usize = 5;

/// Label reported for rows whose grouping column is NULL.
const UNKNOWN_LABEL: &str = "unknown";

const CATEGORY_DISTRIBUTION: &str = "category_distribution";
const TOP_COMMUNITIES: &str = "top_communities";

fn to_count(query: &'static str, column: &str, value: i64) -> Result<u64, QueryFailure> {
    u64::try_from(value).map_err(|_| QueryFailure::Decode {
        query,
        message: format!("negative {} {}", column, value),
    })
}

impl Database {
    /// Posts and distinct users per bias label within the window, largest first.
    pub async fn category_distribution(
        &self,
        window: WindowDays,
    ) -> Result<Vec<CategoryCount>, QueryFailure> {
        let pool = self.pool().await?;

        let rows: Vec<(Option<String>, i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                bias_label,
                COUNT(*) AS post_count,
                COUNT(DISTINCT user_id) AS unique_users
            FROM user_activity
            WHERE timestamp >= ?
            GROUP BY bias_label
            ORDER BY post_count DESC, bias_label
            "#,
        )
        .bind(window_cutoff(window))
        .fetch_all(&pool)
        .await
        .map_err(|e| QueryFailure::execution(CATEGORY_DISTRIBUTION, e))?;

        debug!(window = %window, groups = rows.len(), "Category distribution fetched");

        rows.into_iter()
            .map(|(label, post_count, unique_users)| {
                Ok(CategoryCount {
                    label: label.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    post_count: to_count(CATEGORY_DISTRIBUTION, "post_count", post_count)?,
                    unique_users: to_count(CATEGORY_DISTRIBUTION, "unique_users", unique_users)?,
                })
            })
            .collect()
    }

    /// The five busiest communities within the window, with mean title length.
    pub async fn top_communities(
        &self,
        window: WindowDays,
    ) -> Result<Vec<CommunityCount>, QueryFailure> {
        let pool = self.pool().await?;

        // AVG over an integer column is DECIMAL on MySQL; cast so both
        // backends hand back a plain double.
        let sql = format!(
            r#"
            SELECT
                subreddit,
                COUNT(*) AS post_count,
                CAST(AVG(LENGTH(title)) AS DOUBLE) AS avg_title_length
            FROM user_activity
            WHERE timestamp >= ?
            GROUP BY subreddit
            ORDER BY post_count DESC, subreddit
            LIMIT {}
            "#,
            TOP_COMMUNITIES_LIMIT
        );

        let rows: Vec<(Option<String>, i64, Option<f64>)> = sqlx::query_as(&sql)
            .bind(window_cutoff(window))
            .fetch_all(&pool)
            .await
            .map_err(|e| QueryFailure::execution(TOP_COMMUNITIES, e))?;

        debug!(window = %window, communities = rows.len(), "Top communities fetched");

        rows.into_iter()
            .map(|(community, post_count, avg_title_length)| {
                Ok(CommunityCount {
                    community: community.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    post_count: to_count(TOP_COMMUNITIES, "post_count", post_count)?,
                    avg_title_length,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_count_rejects_negative() {
        assert_eq!(to_count("q", "c", 7).unwrap(), 7);
        let err = to_count("q", "post_count", -1).unwrap_err();
        assert!(matches!(err, QueryFailure::Decode { query: "q", .. }));
    }
}
