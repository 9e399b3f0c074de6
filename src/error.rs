//! Typed errors for the extraction pipeline and document sources.
//!
//! Line-level failures ([`ParseError`]) never leave the pipeline. Source-level
//! failures ([`FetchError`], [`ExtractError`]) abort the document they belong
//! to and, for batch requests, the whole request.

use thiserror::Error;

/// A logical line that could not be decomposed into an incident record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than the three tokens needed for date, time and incident number.
    #[error("expected at least 3 tokens, found {found}")]
    TooFewTokens { found: usize },

    /// A field taken from the line could not be located in the remaining text.
    #[error("'{needle}' not found in remaining line text")]
    SubstringNotFound { needle: String },
}

/// A document source that did not yield a PDF.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The response was not a PDF.
    #[error("URL does not point to a valid PDF file: {url} (Content-Type: {content_type})")]
    InvalidSource { url: String, content_type: String },

    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Transport-level failure.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// PDF text extraction failure for a whole document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Failure of a processing batch.
#[derive(Debug, Error)]
pub enum IngestError {
    /// One document source failed; the whole batch is abandoned.
    #[error("Failed to process {kind} {name}: {reason}")]
    Source {
        kind: SourceKind,
        name: String,
        reason: String,
    },

    /// Storage or runtime failure unrelated to a particular source.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Where a document came from, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Url,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Url => write!(f, "URL"),
        }
    }
}
