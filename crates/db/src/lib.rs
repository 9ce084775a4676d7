//! PostgreSQL persistence for slots and bookings.

pub mod mock;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

pub use store::PgStore;

pub type DbPool = Pool<Postgres>;

/// Seconds a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT_SECS: u64 = 5;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to the slot database")?;

    info!(max_connections, "Database pool ready");
    Ok(pool)
}
