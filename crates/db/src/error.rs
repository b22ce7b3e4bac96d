// crates/db/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// The database could not be reached or failed its liveness probe.
///
/// Carries rendered messages rather than `sqlx::Error` so failures can be
/// cloned into the dashboard's result cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("cannot connect to database: {0}")]
    Connect(String),

    #[error("database liveness probe failed: {0}")]
    Probe(String),
}

/// An aggregation query could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryFailure {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("query {query} failed: {message}")]
    Execution { query: &'static str, message: String },

    #[error("query {query} returned an unusable row: {message}")]
    Decode { query: &'static str, message: String },
}

impl QueryFailure {
    pub(crate) fn execution(query: &'static str, err: sqlx::Error) -> Self {
        Self::Execution {
            query,
            message: err.to_string(),
        }
    }
}

/// Configuration could not be read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors that abort a CSV import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no input CSV files found in {dir}")]
    NoInputFiles { dir: PathBuf },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV {path} has no header row")]
    MissingHeader { path: PathBuf },

    #[error("CSV {path} line {line}: expected {expected} fields, found {found}")]
    RowWidth {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("failed to write table {table}: {source}")]
    Write {
        table: String,
        #[source]
        source: sqlx::Error,
    },
}

impl ImportError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(table: &str, source: sqlx::Error) -> Self {
        Self::Write {
            table: table.to_string(),
            source,
        }
    }
}
