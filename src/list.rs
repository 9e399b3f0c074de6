//! Printing stored incidents.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::ingest::print_record;
use crate::store;

/// `normanpd list`: print stored records in insertion order.
pub async fn run_list(config: &Config, limit: Option<usize>) -> Result<()> {
    let pool = db::connect(config).await?;
    store::init(&pool).await?;
    let records = store::fetch_all(&pool).await?;
    pool.close().await;

    let shown = limit.unwrap_or(records.len()).min(records.len());
    println!(
        "{:<20} {:<16} {:<40} {:<32} {}",
        "TIME", "NUMBER", "LOCATION", "NATURE", "ORI"
    );
    for record in records.iter().take(shown) {
        print_record(record);
    }
    println!();
    println!("{} of {} records", shown, records.len());

    Ok(())
}
