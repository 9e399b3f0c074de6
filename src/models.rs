//! Core data models used throughout the incident pipeline.
//!
//! Raw page lines are reconstructed into [`LogicalLine`]s, which are then
//! decomposed into [`IncidentRecord`]s and persisted in bulk.

use serde::{Deserialize, Serialize};

/// One reconstructed incident line, possibly merged from several physical
/// lines of a page. Starts with a valid date token, except when a page
/// opens with a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine(pub String);

impl LogicalLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicalLine {
    fn from(s: &str) -> Self {
        LogicalLine(s.to_string())
    }
}

/// A structured incident, one row of the `incidents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Date token plus the following (time) token, joined by one space.
    pub incident_time: String,
    pub incident_number: String,
    pub incident_location: String,
    /// Matched vocabulary phrase, empty when nothing matched.
    pub nature: String,
    /// Originating agency identifier (last token of the line).
    pub incident_ori: String,
}
