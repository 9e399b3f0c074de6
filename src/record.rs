//! Decomposes a logical incident line into an [`IncidentRecord`].
//!
//! Line layout: `<date> <time> <incident number> <location...> <nature...> <ORI>`.
//! Location and nature are free text with no delimiter between them, so the
//! fixed fields are cut out first and the nature is found by vocabulary scan;
//! what is left is the location.
//!
//! Cutting fields out by substring is a heuristic: if the incident number or
//! ORI also occurs inside the location, the first occurrence is removed.

use crate::error::ParseError;
use crate::models::{IncidentRecord, LogicalLine};
use crate::nature::Vocabulary;

/// Build a record from one logical line.
pub fn build_record(
    line: &LogicalLine,
    vocabulary: &Vocabulary,
) -> Result<IncidentRecord, ParseError> {
    let tokens: Vec<&str> = line.as_str().split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let incident_time = format!("{} {}", tokens[0], tokens[1]);
    let incident_number = tokens[2].to_string();
    let incident_ori = tokens[tokens.len() - 1].to_string();

    // Single-space form so the joined date/time is always a substring.
    let text = tokens.join(" ");
    let text = remove_first(&text, &incident_time)?;
    let mut text = remove_first(&text, &incident_number)?;
    // With exactly three tokens the ORI is the incident number, already cut.
    if tokens.len() > 3 {
        text = remove_first(&text, &incident_ori)?;
    }

    let (nature, location) = vocabulary.match_nature(&text);

    Ok(IncidentRecord {
        incident_time,
        incident_number,
        incident_location: location.trim().to_string(),
        nature,
        incident_ori,
    })
}

fn remove_first(text: &str, needle: &str) -> Result<String, ParseError> {
    if !text.contains(needle) {
        return Err(ParseError::SubstringNotFound {
            needle: needle.to_string(),
        });
    }
    Ok(text.replacen(needle, "", 1))
}
