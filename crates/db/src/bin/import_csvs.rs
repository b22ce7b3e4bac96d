// crates/db/src/bin/import_csvs.rs
//! One-shot CSV importer: loads `data/*.csv` into the MySQL database.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use echo_break_db::import::{import_directory, DATA_DIR};
use echo_break_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Seconds to wait for the database container before connecting.
const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;

fn startup_delay() -> Result<Duration> {
    match std::env::var("IMPORT_STARTUP_DELAY_SECS") {
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("invalid IMPORT_STARTUP_DELAY_SECS: {raw:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(DEFAULT_STARTUP_DELAY_SECS)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,echo_break_db=info,echo_break_import=info".into()),
        )
        .init();

    let config = DbConfig::for_import_from_env()?;

    let delay = startup_delay()?;
    if !delay.is_zero() {
        info!(delay_secs = delay.as_secs(), "Waiting for database to come up");
        tokio::time::sleep(delay).await;
    }

    let db = Database::connect(config)
        .await
        .context("could not connect to the import database")?;

    let report = import_directory(&db, Path::new(DATA_DIR))
        .await
        .context("CSV import failed")?;

    for table in &report.tables {
        println!(
            "Imported {} rows ({} columns) into {}",
            table.rows,
            table.columns.len(),
            table.table
        );
    }
    println!("All CSV files imported successfully!");

    db.close().await;
    Ok(())
}
