// crates/db/src/provider.rs
//! Long-lived, periodically re-validated database handle.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::DbConfig;
use crate::error::ConnectionError;

/// A pool that passed its liveness probe at `validated_at`.
struct ValidatedPool {
    pool: AnyPool,
    validated_at: Instant,
}

/// Hands out a shared connection pool.
///
/// The pool is created on the first call to [`get`](Self::get) and trusted
/// for `refresh_interval`. The first call after that window re-probes it; a
/// pool that fails the probe is closed and rebuilt. Connection attempts are
/// serialized, so concurrent callers never build two pools.
pub struct ConnectionProvider {
    config: DbConfig,
    slot: Mutex<Option<ValidatedPool>>,
}

impl ConnectionProvider {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Return a pool that has been validated within the refresh interval.
    pub async fn get(&self) -> Result<AnyPool, ConnectionError> {
        let mut slot = self.slot.lock().await;

        if let Some(current) = slot.as_mut() {
            if current.validated_at.elapsed() < self.config.refresh_interval {
                return Ok(current.pool.clone());
            }
            let probed = probe(&current.pool).await;
            match probed {
                Ok(()) => {
                    debug!("Database handle re-validated");
                    current.validated_at = Instant::now();
                    return Ok(current.pool.clone());
                }
                Err(e) => {
                    warn!(error = %e, "Cached database handle failed probe; reconnecting");
                    current.pool.close().await;
                }
            }
        }
        *slot = None;

        let pool = connect(&self.config).await?;
        *slot = Some(ValidatedPool {
            pool: pool.clone(),
            validated_at: Instant::now(),
        });
        Ok(pool)
    }

    /// Close the cached pool, if any. The next `get` reconnects.
    pub async fn close(&self) {
        if let Some(current) = self.slot.lock().await.take() {
            current.pool.close().await;
        }
    }
}

async fn connect(config: &DbConfig) -> Result<AnyPool, ConnectionError> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| ConnectionError::Connect(e.to_string()))?;

    if let Err(e) = probe(&pool).await {
        pool.close().await;
        return Err(e);
    }

    info!(backend = backend_name(&config.url), "Database connection established");
    Ok(pool)
}

/// Trivial round-trip used to prove the handle is alive.
async fn probe(pool: &AnyPool) -> Result<(), ConnectionError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| ConnectionError::Probe(e.to_string()))
}

/// URL scheme only; never log credentials.
fn backend_name(url: &str) -> &str {
    url.split_once(':').map(|(scheme, _)| scheme).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sqlite_url(dir: &tempfile::TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("provider.db").display())
    }

    #[tokio::test]
    async fn test_get_validates_and_reuses() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ConnectionProvider::new(DbConfig::new(sqlite_url(&tmp)));

        let first = provider.get().await.expect("first connect");
        let second = provider.get().await.expect("cached handle");
        assert!(!first.is_closed());
        assert!(!second.is_closed());

        // Both handles point at the same pool: closing one closes the other.
        first.close().await;
        assert!(second.is_closed());
    }

    #[tokio::test]
    async fn test_expired_handle_is_rebuilt_after_failed_probe() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbConfig::new(sqlite_url(&tmp)).with_refresh_interval(Duration::ZERO);
        let provider = ConnectionProvider::new(config);

        let first = provider.get().await.unwrap();
        first.close().await;

        let second = provider.get().await.expect("reconnect after failed probe");
        assert!(!second.is_closed());
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&second).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_tagged_error() {
        let tmp = tempfile::tempdir().unwrap();
        // mode=rw refuses to create the file, and the directory does not exist.
        let url = format!(
            "sqlite://{}?mode=rw",
            tmp.path().join("missing").join("nope.db").display()
        );
        let provider = ConnectionProvider::new(
            DbConfig::new(url).with_acquire_timeout(Duration::from_secs(2)),
        );

        let err = provider.get().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Connect(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_close_forces_reconnect() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ConnectionProvider::new(DbConfig::new(sqlite_url(&tmp)));

        let first = provider.get().await.unwrap();
        provider.close().await;
        assert!(first.is_closed());

        let second = provider.get().await.unwrap();
        assert!(!second.is_closed());
    }

    #[test]
    fn test_backend_name_hides_credentials() {
        assert_eq!(backend_name("mysql://root:secret@db:3306/x"), "mysql");
        assert_eq!(backend_name("garbage"), "unknown");
    }
}
