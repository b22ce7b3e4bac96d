// crates/db/src/lib.rs
//! Database access for the Echo Break dashboard: connection handling,
//! windowed aggregation queries, and the bulk CSV importer.

pub mod config;
pub mod error;
pub mod import;
pub mod provider;
mod queries;
pub mod source;

pub use config::DbConfig;
pub use error::{ConfigError, ConnectionError, ImportError, QueryFailure};
pub use import::{ImportReport, TableReport};
pub use provider::ConnectionProvider;
pub use queries::{window_cutoff, ACTIVITY_TABLE, TOP_COMMUNITIES_LIMIT};
pub use source::ActivitySource;

use sqlx::AnyPool;
use std::sync::Arc;

/// Main database handle.
///
/// Cheap to clone; every clone shares one [`ConnectionProvider`]. No
/// connection is opened until the first query (or [`Database::connect`]).
#[derive(Clone)]
pub struct Database {
    provider: Arc<ConnectionProvider>,
}

impl Database {
    /// Create a lazily-connecting handle.
    pub fn new(config: DbConfig) -> Self {
        Self {
            provider: Arc::new(ConnectionProvider::new(config)),
        }
    }

    /// Create a handle and open + validate the connection immediately.
    pub async fn connect(config: DbConfig) -> Result<Self, ConnectionError> {
        let db = Self::new(config);
        db.pool().await?;
        Ok(db)
    }

    /// A validated pool, reconnecting if the cached one has gone stale.
    pub async fn pool(&self) -> Result<AnyPool, ConnectionError> {
        self.provider.get().await
    }

    pub async fn close(&self) {
        self.provider.close().await;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("max_connections", &self.provider.config().max_connections)
            .finish_non_exhaustive()
    }
}
