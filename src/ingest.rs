//! Batch orchestration: sources → page text → records → store.
//!
//! Every batch is all-or-nothing at the source level: the first document that
//! cannot be fetched or read aborts the batch before the store is touched.
//! Within a batch the store is replaced exactly once.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::db;
use crate::error::{IngestError, SourceKind};
use crate::extract::extract_page_text;
use crate::fetch;
use crate::models::IncidentRecord;
use crate::pipeline::{BatchStats, Pipeline};
use crate::store;
use crate::uploads;

/// Extract page text off the async runtime.
pub async fn read_pages(
    kind: SourceKind,
    name: &str,
    bytes: Vec<u8>,
) -> Result<Vec<String>, IngestError> {
    let pages = tokio::task::spawn_blocking(move || extract_page_text(&bytes))
        .await
        .context("PDF extraction task failed")?;

    pages.map_err(|e| {
        warn!(%kind, name, error = %e, "source rejected");
        IngestError::Source {
            kind,
            name: name.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Download a report, keep a copy under `upload_dir`, and extract its pages.
pub async fn fetch_pages(
    client: &reqwest::Client,
    upload_dir: &Path,
    url: &str,
) -> Result<Vec<String>, IngestError> {
    let bytes = fetch::fetch_document(client, url).await.map_err(|e| {
        warn!(url, error = %e, "fetch failed");
        IngestError::Source {
            kind: SourceKind::Url,
            name: url.to_string(),
            reason: e.to_string(),
        }
    })?;

    uploads::save(upload_dir, uploads::FETCHED_REPORT_NAME, &bytes)?;
    read_pages(SourceKind::Url, url, bytes).await
}

/// Turn extracted documents into records and replace the store with them.
pub async fn replace_batch(
    pool: &SqlitePool,
    pipeline: Arc<Pipeline>,
    documents: Vec<Vec<String>>,
) -> Result<BatchStats> {
    let (records, stats) =
        tokio::task::spawn_blocking(move || pipeline.process_pages(documents.as_slice())).await?;

    store::replace_all(pool, &records).await?;

    info!(
        documents = stats.documents,
        pages = stats.pages,
        lines = stats.logical_lines,
        records = stats.records,
        dropped = stats.dropped,
        "incident table replaced"
    );
    Ok(stats)
}

/// `normanpd ingest`: process local PDF files in argument order.
pub async fn run_ingest(config: &Config, files: &[PathBuf]) -> Result<()> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path.display().to_string();
        documents.push(read_pages(SourceKind::File, &name, bytes).await?);
    }

    let pool = db::connect(config).await?;
    let stats = replace_batch(&pool, Arc::new(config.parsing.pipeline()), documents).await?;
    pool.close().await;

    print_stats("ingest", &stats);
    Ok(())
}

/// `normanpd fetch`: download and process URLs in argument order.
pub async fn run_fetch(config: &Config, urls: &[String]) -> Result<()> {
    let client = fetch::build_client(&config.fetch)?;

    let mut documents = Vec::with_capacity(urls.len());
    for url in urls {
        documents.push(fetch_pages(&client, &config.storage.upload_dir, url).await?);
    }

    let pool = db::connect(config).await?;
    let stats = replace_batch(&pool, Arc::new(config.parsing.pipeline()), documents).await?;
    pool.close().await;

    print_stats("fetch", &stats);
    Ok(())
}

/// `normanpd parse`: print the records a PDF would yield, without storing.
pub async fn run_parse(config: &Config, file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let pages = read_pages(SourceKind::File, &file.display().to_string(), bytes).await?;

    let (records, stats) = config.parsing.pipeline().process_pages(&[pages][..]);
    for record in &records {
        print_record(record);
    }
    print_stats("parse (dry-run)", &stats);
    Ok(())
}

pub fn print_record(record: &IncidentRecord) {
    println!(
        "{:<20} {:<16} {:<40} {:<32} {}",
        record.incident_time,
        record.incident_number,
        record.incident_location,
        record.nature,
        record.incident_ori
    );
}

fn print_stats(label: &str, stats: &BatchStats) {
    println!("{}", label);
    println!("  documents: {}", stats.documents);
    println!("  pages: {}", stats.pages);
    println!("  logical lines: {}", stats.logical_lines);
    println!("  records: {}", stats.records);
    println!("  lines dropped: {}", stats.dropped);
    println!("ok");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreadable_pdf_is_a_named_source_error() {
        let err = read_pages(SourceKind::File, "day1.pdf", b"not a pdf".to_vec())
            .await
            .unwrap_err();
        match err {
            IngestError::Source { kind, name, .. } => {
                assert_eq!(kind, SourceKind::File);
                assert_eq!(name, "day1.pdf");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
