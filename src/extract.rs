//! PDF page-text extraction.
//!
//! Sources supply raw bytes; this module returns one UTF-8 string per page.
//! A document that cannot be read at all is an error. A page that carries no
//! text comes back as an empty string and reconstructs to zero lines.
//!
//! `pdf_extract` panics on some malformed documents. Those panics are caught
//! here and reported as [`ExtractError::Pdf`], like any unreadable PDF.

use std::fmt::Display;
use std::panic::{self, UnwindSafe};

use crate::error::ExtractError;

pub const MIME_PDF: &str = "application/pdf";

/// Extract the text of every page of a PDF, in page order.
pub fn extract_page_text(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    guarded(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
}

fn guarded<T, E, F>(extract: F) -> Result<T, ExtractError>
where
    E: Display,
    F: FnOnce() -> Result<T, E> + UnwindSafe,
{
    match panic::catch_unwind(extract) {
        Ok(result) => result.map_err(|e| ExtractError::Pdf(e.to_string())),
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExtractError::Pdf(format!("PDF reader panicked: {}", detail)))
        }
    }
}

/// Returns `true` when a `Content-Type` header value names a PDF.
///
/// Matches on the substring `pdf`, so `application/pdf`,
/// `application/x-pdf` and `application/pdf; charset=binary` all qualify.
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.contains("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_page_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn reader_panic_becomes_pdf_error() {
        let result: Result<Vec<String>, ExtractError> =
            guarded(|| -> Result<Vec<String>, String> { panic!("bad xref") });
        match result {
            Err(ExtractError::Pdf(msg)) => assert!(msg.contains("bad xref"), "{}", msg),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn reader_error_keeps_its_message() {
        let result: Result<Vec<String>, ExtractError> =
            guarded(|| Err::<Vec<String>, _>("no trailer"));
        assert_eq!(result.unwrap_err().to_string(), "PDF extraction failed: no trailer");
    }

    #[test]
    fn empty_input_returns_error() {
        assert!(extract_page_text(b"").is_err());
    }

    #[test]
    fn pdf_content_types() {
        assert!(is_pdf_content_type(MIME_PDF));
        assert!(is_pdf_content_type("application/pdf; charset=binary"));
        assert!(is_pdf_content_type("application/x-pdf"));
        assert!(!is_pdf_content_type("text/html; charset=utf-8"));
        assert!(!is_pdf_content_type(""));
    }
}
