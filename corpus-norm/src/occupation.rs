//! Occupation label mapping
//!
//! Labels are matched verbatim against the reference table's `Role` column.
//! The source data is curated upstream, so a label with no entry is a gap in
//! the reference table and stops the run.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Categorical code for an occupation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupationCode {
    pub major: String,
    pub minor: String,
    pub number: i64,
}

/// One reference table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationEntry {
    pub role: String,
    pub code: OccupationCode,
}

/// In-memory reference table keyed by exact label
#[derive(Debug, Default)]
pub struct OccupationTable {
    by_role: HashMap<String, OccupationCode>,
}

impl OccupationTable {
    /// Build the lookup from reference rows in table order
    ///
    /// When a label appears more than once the first row is kept.
    pub fn from_entries(entries: impl IntoIterator<Item = OccupationEntry>) -> Self {
        let mut by_role = HashMap::new();
        for entry in entries {
            if by_role.contains_key(&entry.role) {
                warn!(role = %entry.role, "Duplicate occupation label in reference table, keeping first");
                continue;
            }
            by_role.insert(entry.role, entry.code);
        }
        Self { by_role }
    }

    pub fn len(&self) -> usize {
        self.by_role.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    /// Exact-match lookup
    pub fn lookup(&self, label: &str) -> Option<&OccupationCode> {
        self.by_role.get(label)
    }

    /// Map the occupation of `row_id`, failing the run when unmapped
    pub fn map(&self, row_id: i64, label: Option<&str>) -> Result<OccupationCode> {
        label
            .and_then(|l| self.lookup(l))
            .cloned()
            .ok_or_else(|| Error::UnmappedOccupation {
                row_id,
                label: label.unwrap_or("NULL").to_string(),
            })
    }
}
