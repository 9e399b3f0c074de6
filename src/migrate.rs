use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

/// Create the database file and the `incidents` table. Safe to repeat.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    store::init(&pool).await?;
    pool.close().await;
    Ok(())
}
