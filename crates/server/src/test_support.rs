//! Call-counting `ActivitySource` double for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use echo_break_core::{CategoryCount, CommunityCount, WindowDays};
use echo_break_db::{ActivitySource, ConnectionError, QueryFailure};

pub(crate) struct StubSource {
    categories: Result<Vec<CategoryCount>, QueryFailure>,
    communities: Result<Vec<CommunityCount>, QueryFailure>,
    pub(crate) category_calls: AtomicUsize,
    pub(crate) community_calls: AtomicUsize,
}

impl StubSource {
    pub(crate) fn live(categories: Vec<CategoryCount>, communities: Vec<CommunityCount>) -> Self {
        Self::with_results(Ok(categories), Ok(communities))
    }

    pub(crate) fn empty() -> Self {
        Self::live(Vec::new(), Vec::new())
    }

    /// Both queries fail as if the database were unreachable.
    pub(crate) fn failing() -> Self {
        let err = QueryFailure::from(ConnectionError::Connect("connection refused".into()));
        Self::with_results(Err(err.clone()), Err(err))
    }

    fn with_results(
        categories: Result<Vec<CategoryCount>, QueryFailure>,
        communities: Result<Vec<CommunityCount>, QueryFailure>,
    ) -> Self {
        Self {
            categories,
            communities,
            category_calls: AtomicUsize::new(0),
            community_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ActivitySource for StubSource {
    async fn category_distribution(
        &self,
        _window: WindowDays,
    ) -> Result<Vec<CategoryCount>, QueryFailure> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.categories.clone()
    }

    async fn top_communities(
        &self,
        _window: WindowDays,
    ) -> Result<Vec<CommunityCount>, QueryFailure> {
        self.community_calls.fetch_add(1, Ordering::SeqCst);
        self.communities.clone()
    }
}
