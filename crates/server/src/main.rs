// crates/server/src/main.rs
//! Echo Break dashboard server binary.
//!
//! Starts serving immediately; the database is first contacted by the first
//! dashboard request, and an unreachable database only produces sample data.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use echo_break_db::{Database, DbConfig};
use echo_break_server::{create_app_full, init_metrics, AggregateCache, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "warn,echo_break=info,echo_break_server=info,echo_break_db=info".into()
            }),
        )
        .init();

    init_metrics();

    let db_config = DbConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    eprintln!("\n  echo-break v{}\n", env!("CARGO_PKG_VERSION"));

    let db = Database::new(db_config);
    let cache = AggregateCache::new(Arc::new(db.clone()));
    let state = AppState::with_cache(cache, server_config.default_window);
    let app = create_app_full(state, server_config.static_dir.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        window = %server_config.default_window,
        static_dir = ?server_config.static_dir,
        "Dashboard server listening"
    );
    eprintln!("  \u{2192} http://localhost:{}\n", server_config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    db.close().await;
    Ok(())
}
