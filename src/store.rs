//! The `incidents` table.
//!
//! Five TEXT columns, no keys. Every processed batch replaces the table
//! (drop, recreate, bulk insert) inside one transaction; there is no append
//! across batches.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::models::IncidentRecord;

const CREATE_INCIDENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS incidents (
        incident_time TEXT,
        incident_number TEXT,
        incident_location TEXT,
        nature TEXT,
        incident_ori TEXT
    )
"#;

/// Create the table if it does not exist yet. Idempotent.
pub async fn init(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_INCIDENTS).execute(pool).await?;
    Ok(())
}

/// Replace the whole table with `records`, preserving their order.
pub async fn replace_all(pool: &SqlitePool, records: &[IncidentRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS incidents")
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_INCIDENTS).execute(&mut *tx).await?;

    for record in records {
        sqlx::query(
            r#"
            INSERT INTO incidents (incident_time, incident_number, incident_location, nature, incident_ori)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.incident_time)
        .bind(&record.incident_number)
        .bind(&record.incident_location)
        .bind(&record.nature)
        .bind(&record.incident_ori)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// All stored records in insertion order.
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<IncidentRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT incident_time, incident_number, incident_location, nature, incident_ori
        FROM incidents
        ORDER BY rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| IncidentRecord {
            incident_time: text(row, "incident_time"),
            incident_number: text(row, "incident_number"),
            incident_location: text(row, "incident_location"),
            nature: text(row, "nature"),
            incident_ori: text(row, "incident_ori"),
        })
        .collect())
}

/// Number of incidents per nature, most frequent first.
pub async fn nature_counts(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT COALESCE(nature, '') AS nature, COUNT(*) AS count
        FROM incidents
        GROUP BY COALESCE(nature, '')
        ORDER BY count DESC, nature ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("nature"), row.get("count")))
        .collect())
}

fn text(row: &sqlx::sqlite::SqliteRow, column: &str) -> String {
    row.get::<Option<String>, _>(column).unwrap_or_default()
}
