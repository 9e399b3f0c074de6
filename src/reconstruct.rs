//! Line reconstruction for extracted incident-report pages.
//!
//! PDF text extraction wraps long incident rows (usually the location column)
//! across two or more physical lines. The only reliable signal that a new
//! incident starts is a well-formed leading date, so every line that does not
//! start with one is folded into the logical line before it.
//!
//! Reconstruction state is scoped to a single page: a continuation at the top
//! of a page has nothing to merge into and becomes that page's first line.

use crate::date::{is_valid_date_with, DEFAULT_DATE_FORMAT};
use crate::models::LogicalLine;

/// Page header lines start with one of these tokens.
pub const DEFAULT_HEADER_MARKERS: &[&str] = &["Norman", "Daily", "Date"];

/// Joins a continuation line onto the logical line it belongs to.
pub const CONTINUATION_SEPARATOR: &str = " ";

/// Reconstruction settings: the leading-date format and header markers.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    date_format: String,
    header_markers: Vec<String>,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            header_markers: DEFAULT_HEADER_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl Reconstructor {
    pub fn new(date_format: impl Into<String>, header_markers: Vec<String>) -> Self {
        Self {
            date_format: date_format.into(),
            header_markers,
        }
    }

    /// Reconstruct the logical lines of one page of extracted text.
    pub fn reconstruct(&self, page_text: &str) -> Vec<LogicalLine> {
        let mut lines: Vec<LogicalLine> = Vec::new();

        for raw in page_text.lines() {
            let first = match raw.split_whitespace().next() {
                Some(token) => token,
                None => continue,
            };
            if self.header_markers.iter().any(|m| m == first) {
                continue;
            }

            if is_valid_date_with(first, &self.date_format) {
                lines.push(LogicalLine(raw.to_string()));
                continue;
            }

            match lines.last_mut() {
                Some(previous) => {
                    let merged = format!("{}{}{}", previous.0, CONTINUATION_SEPARATOR, raw);
                    *previous = LogicalLine(merged);
                }
                None => lines.push(LogicalLine(raw.to_string())),
            }
        }

        lines
    }

    /// Reconstruct every page of a document, in page order.
    pub fn reconstruct_pages<S: AsRef<str>>(&self, pages: &[S]) -> Vec<LogicalLine> {
        pages
            .iter()
            .flat_map(|page| self.reconstruct(page.as_ref()))
            .collect()
    }
}

/// [`Reconstructor::reconstruct`] with the default date format and markers.
pub fn reconstruct(page_text: &str) -> Vec<LogicalLine> {
    Reconstructor::default().reconstruct(page_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[LogicalLine]) -> Vec<&str> {
        lines.iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn well_formed_lines_pass_through_unchanged() {
        let page = "01/01/2024 12:00 111 Main St Welfare Check ORI1\n\
                    01/02/2024 13:30 112 Elm St Traffic Stop ORI2";
        let lines = reconstruct(page);
        assert_eq!(
            texts(&lines),
            vec![
                "01/01/2024 12:00 111 Main St Welfare Check ORI1",
                "01/02/2024 13:30 112 Elm St Traffic Stop ORI2",
            ]
        );
    }

    #[test]
    fn continuation_is_merged_into_previous_line() {
        let page = "01/01/2024 12:00 111 Main St Welfare Check ORI1\nApartment 4B";
        let lines = reconstruct(page);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].as_str(),
            "01/01/2024 12:00 111 Main St Welfare Check ORI1 Apartment 4B"
        );
    }

    #[test]
    fn short_year_date_does_not_start_a_line() {
        let page = "01/01/2024 12:00 111 Main St Welfare Check ORI1\n01/01/24 follow-up";
        let lines = reconstruct(page);
        assert_eq!(
            texts(&lines),
            vec!["01/01/2024 12:00 111 Main St Welfare Check ORI1 01/01/24 follow-up"]
        );
    }

    #[test]
    fn multiple_continuations_chain_onto_same_line() {
        let page = "01/01/2024 12:00 111 1200 W\nLINDSEY ST\nWelfare Check ORI1\n\
                    01/01/2024 12:05 112 Elm St Fight ORI1";
        let lines = reconstruct(page);
        assert_eq!(
            texts(&lines),
            vec![
                "01/01/2024 12:00 111 1200 W LINDSEY ST Welfare Check ORI1",
                "01/01/2024 12:05 112 Elm St Fight ORI1",
            ]
        );
    }

    #[test]
    fn headers_and_blank_lines_are_skipped() {
        let page = "Daily Incident Summary (Public)\n\
                    Date / Time Incident Number Location Nature Incident ORI\n\
                    \n   \n\
                    01/01/2024 12:00 111 Main St Fight ORI1\n\
                    Norman Police Department";
        let lines = reconstruct(page);
        assert_eq!(texts(&lines), vec!["01/01/2024 12:00 111 Main St Fight ORI1"]);
    }

    #[test]
    fn leading_continuation_does_not_panic() {
        let page = "Apartment 4B\n01/01/2024 12:00 111 Main St Fight ORI1";
        let lines = reconstruct(page);
        assert_eq!(
            texts(&lines),
            vec!["Apartment 4B", "01/01/2024 12:00 111 Main St Fight ORI1"]
        );
    }

    #[test]
    fn pages_do_not_share_continuation_state() {
        let pages = vec![
            "01/01/2024 12:00 111 Main St Fight ORI1".to_string(),
            "wrapped tail\n01/02/2024 08:00 112 Elm St Fight ORI1".to_string(),
        ];
        let lines = Reconstructor::default().reconstruct_pages(&pages);
        assert_eq!(
            texts(&lines),
            vec![
                "01/01/2024 12:00 111 Main St Fight ORI1",
                "wrapped tail",
                "01/02/2024 08:00 112 Elm St Fight ORI1",
            ]
        );
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(reconstruct("").is_empty());
    }

    #[test]
    fn custom_markers_and_format() {
        let r = Reconstructor::new("%Y-%m-%d", vec!["Report".to_string()]);
        let lines = r.reconstruct("Report header\n2024-01-01 10:00 1 A B\ntail");
        assert_eq!(texts(&lines), vec!["2024-01-01 10:00 1 A B tail"]);
    }
}
