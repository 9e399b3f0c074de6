//! End-to-end extraction: documents → pages → logical lines → records.
//!
//! Line reconstruction is strictly sequential within a document; records come
//! out in document order, then page order, then line order. Lines that fail
//! to parse are dropped and processing continues with the next line.

use tracing::debug;

use crate::error::ExtractError;
use crate::extract::extract_page_text;
use crate::models::{IncidentRecord, LogicalLine};
use crate::nature::Vocabulary;
use crate::reconstruct::Reconstructor;
use crate::record::build_record;

/// Parsing settings shared by every document in a batch.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub reconstructor: Reconstructor,
    pub vocabulary: Vocabulary,
}

/// Per-batch counters, reported by the CLI and logged by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub documents: usize,
    pub pages: usize,
    pub logical_lines: usize,
    pub records: usize,
    pub dropped: usize,
}

impl Pipeline {
    pub fn new(reconstructor: Reconstructor, vocabulary: Vocabulary) -> Self {
        Self {
            reconstructor,
            vocabulary,
        }
    }

    /// Build records from logical lines, silently dropping unparsable ones.
    pub fn records_from_lines(&self, lines: &[LogicalLine]) -> Vec<IncidentRecord> {
        lines
            .iter()
            .filter_map(|line| match build_record(line, &self.vocabulary) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(line = line.as_str(), error = %e, "dropping unparsable line");
                    None
                }
            })
            .collect()
    }

    /// Reconstruct and parse the already-extracted pages of one document.
    pub fn records_from_pages<S: AsRef<str>>(&self, pages: &[S]) -> Vec<IncidentRecord> {
        let lines = self.reconstructor.reconstruct_pages(pages);
        self.records_from_lines(&lines)
    }

    /// Process a batch of PDF documents in order.
    ///
    /// A document that is not a readable PDF fails the whole batch.
    pub fn process<B: AsRef<[u8]>>(
        &self,
        documents: &[B],
    ) -> Result<(Vec<IncidentRecord>, BatchStats), ExtractError> {
        let mut pages_per_doc = Vec::with_capacity(documents.len());
        for doc in documents {
            pages_per_doc.push(extract_page_text(doc.as_ref())?);
        }
        Ok(self.process_pages(pages_per_doc.as_slice()))
    }

    /// Process a batch whose documents have already been split into pages.
    pub fn process_pages<S: AsRef<str>>(
        &self,
        documents: &[Vec<S>],
    ) -> (Vec<IncidentRecord>, BatchStats) {
        let mut stats = BatchStats {
            documents: documents.len(),
            ..Default::default()
        };
        let mut records = Vec::new();

        for pages in documents {
            stats.pages += pages.len();
            let lines = self.reconstructor.reconstruct_pages(pages.as_slice());
            stats.logical_lines += lines.len();
            records.extend(self.records_from_lines(&lines));
        }

        stats.records = records.len();
        stats.dropped = stats.logical_lines - stats.records;
        (records, stats)
    }
}

/// [`Pipeline::process`] with the default reconstruction settings.
pub fn process<B: AsRef<[u8]>>(
    documents: &[B],
    vocabulary: &Vocabulary,
) -> Result<Vec<IncidentRecord>, ExtractError> {
    let pipeline = Pipeline::new(Reconstructor::default(), vocabulary.clone());
    pipeline.process(documents).map(|(records, _)| records)
}
