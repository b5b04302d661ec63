//! PostgreSQL pool for the note and session repositories.

use std::time::Instant;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use jotter_core::{Error, Result};

/// Open a pool capped at `max_connections`.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections,
        duration_ms = start.elapsed().as_millis() as u64,
        "Note store pool ready"
    );
    Ok(pool)
}

/// Log open and idle connection counts; warn when every connection is busy.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool status"
    );

    if size > 0 && idle == 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "All pooled connections are busy"
        );
    }
}
