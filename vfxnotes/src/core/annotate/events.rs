//! Event Records
//!
//! Caller-supplied, ordered VFX event list. Records are read from the JSON
//! export of the turnover spreadsheet; only the VFX ID column is used.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};

/// One external event (a VFX shot)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "VFX ID", alias = "vfxId", alias = "identifier")]
    pub identifier: String,
}

impl EventRecord {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
        }
    }
}

/// Builds records from bare identifiers
pub fn events_from_ids<S: AsRef<str>>(identifiers: &[S]) -> Vec<EventRecord> {
    identifiers
        .iter()
        .map(|id| EventRecord::new(id.as_ref()))
        .collect()
}

/// Parses and validates an events JSON array
pub fn parse_events(json: &str) -> CoreResult<Vec<EventRecord>> {
    let events: Vec<EventRecord> =
        serde_json::from_str(json).map_err(|e| CoreError::InvalidEvents(e.to_string()))?;
    validate_events(&events)?;
    Ok(events)
}

/// Reads, parses and validates an events JSON file
pub fn load_events(path: &Path) -> CoreResult<Vec<EventRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_events(&content)
}

/// Rejects an empty list and blank identifiers
pub fn validate_events(events: &[EventRecord]) -> CoreResult<()> {
    if events.is_empty() {
        return Err(CoreError::EmptyEventList);
    }

    if let Some(position) = events.iter().position(|e| e.identifier.trim().is_empty()) {
        return Err(CoreError::ValidationError(format!(
            "Event {} has an empty VFX ID",
            position + 1
        )));
    }

    Ok(())
}
