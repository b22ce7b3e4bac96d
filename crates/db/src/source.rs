// crates/db/src/source.rs
//! The aggregation interface the dashboard depends on.

use async_trait::async_trait;
use echo_break_core::{CategoryCount, CommunityCount, WindowDays};

use crate::error::QueryFailure;
use crate::Database;

/// Anything that can answer the dashboard's two aggregation queries.
///
/// [`Database`] is the production implementation; tests substitute doubles
/// that count calls or fail on demand.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Posts and distinct users per category label, largest first.
    async fn category_distribution(
        &self,
        window: WindowDays,
    ) -> Result<Vec<CategoryCount>, QueryFailure>;

    /// At most five communities, largest first.
    async fn top_communities(&self, window: WindowDays)
        -> Result<Vec<CommunityCount>, QueryFailure>;
}

#[async_trait]
impl ActivitySource for Database {
    async fn category_distribution(
        &self,
        window: WindowDays,
    ) -> Result<Vec<CategoryCount>, QueryFailure> {
        Database::category_distribution(self, window).await
    }

    async fn top_communities(
        &self,
        window: WindowDays,
    ) -> Result<Vec<CommunityCount>, QueryFailure> {
        Database::top_communities(self, window).await
    }
}
