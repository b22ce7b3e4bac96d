// crates/db/src/config.rs
//! Database settings read from the environment.

use std::time::Duration;

use crate::error::ConfigError;

/// How long a validated connection handle is trusted before it is re-probed.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
/// Upper bound on waiting for a free pooled connection. Statement run time
/// is not limited.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Connection settings for the activity database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Any sqlx URL: `mysql://…` in deployment, `sqlite://…` locally and in tests.
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub refresh_interval: Duration,
}

/// Environment variable names and defaults for one MySQL endpoint.
struct MysqlEnv {
    host: (&'static str, &'static str),
    port: Option<(&'static str, &'static str)>,
    user: (&'static str, &'static str),
    password: (&'static str, &'static str),
    database: (&'static str, &'static str),
}

const DASHBOARD_ENV: MysqlEnv = MysqlEnv {
    host: ("DB_HOST", "database"),
    port: Some(("DB_PORT", "3306")),
    user: ("DB_USER", "root"),
    password: ("DB_PASSWORD", "root"),
    database: ("DB_NAME", "mydatabase"),
};

const IMPORT_ENV: MysqlEnv = MysqlEnv {
    host: ("MYSQL_HOST", "mysql_db"),
    port: None,
    user: ("MYSQL_USER", "root"),
    password: ("MYSQL_PASSWORD", "root"),
    database: ("MYSQL_DATABASE", "mydatabase"),
};

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Settings for the dashboard: `DB_USER`, `DB_PASSWORD`, `DB_HOST`,
    /// `DB_PORT`, `DB_NAME`, or a full `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&DASHBOARD_ENV, |key| std::env::var(key).ok())
    }

    /// Settings for the CSV importer: `MYSQL_HOST`, `MYSQL_USER`,
    /// `MYSQL_PASSWORD`, `MYSQL_DATABASE` (port 3306), or a full `DATABASE_URL`.
    pub fn for_import_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&IMPORT_ENV, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        env: &MysqlEnv,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |(key, default): (&str, &str)| lookup(key).unwrap_or_else(|| default.to_string());

        let url = match lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => {
                let port = match env.port {
                    Some(var) => {
                        let raw = get(var);
                        raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                            key: var.0,
                            value: raw.clone(),
                        })?
                    }
                    None => 3306,
                };
                format!(
                    "mysql://{}:{}@{}:{}/{}",
                    urlencoding::encode(&get(env.user)),
                    urlencoding::encode(&get(env.password)),
                    get(env.host),
                    port,
                    get(env.database),
                )
            }
        };

        let mut config = Self::new(url);
        if let Some(raw) = lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "DB_ACQUIRE_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.acquire_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
