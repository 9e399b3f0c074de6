//! Database statistics.
//!
//! A quick summary of what the last batch stored: record count, file size
//! and the per-nature breakdown the charts are drawn from.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    store::init(&pool).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
        .fetch_one(&pool)
        .await?;
    let counts = store::nature_counts(&pool).await?;
    pool.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("normanpd — Database Stats");
    println!("=========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Incidents:   {}", total);
    println!("  Natures:     {}", counts.len());

    if !counts.is_empty() {
        println!();
        println!("  {:<40} {:>6} {:>7}", "NATURE", "COUNT", "SHARE");
        println!("  {}", "-".repeat(55));
        for (nature, count) in &counts {
            let label = if nature.is_empty() {
                "(unmatched)"
            } else {
                nature.as_str()
            };
            println!(
                "  {:<40} {:>6} {:>6.1}%",
                label,
                count,
                share(*count, total)
            );
        }
    }

    println!();
    Ok(())
}

fn share(count: i64, total: i64) -> f64 {
    if total > 0 {
        count as f64 * 100.0 / total as f64
    } else {
        0.0
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
