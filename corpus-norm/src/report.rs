//! Run diagnostics
//!
//! Recoverable conditions are collected during a run and reported once at
//! the end. The skip-list may receive the same talk many times (once per
//! skipped row); reporting collapses it to distinct talks in first-seen
//! order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Which person in a row a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Speaker,
    Interlocutor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Speaker => f.write_str("speaker"),
            Role::Interlocutor => f.write_str("interlocutor"),
        }
    }
}

/// Recoverable condition encountered during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// Talk does not have exactly two known speakers
    NonDyadic { talk_id: String, participants: usize },
    /// Speaker or interlocutor ID is a placeholder without demographics
    PlaceholderParticipant {
        talk_id: String,
        row_id: i64,
        role: Role,
        participant_id: String,
    },
    /// Age field is neither marked nor a bare integer
    NonNumericAge {
        row_id: i64,
        role: Role,
        raw: Option<String>,
    },
    /// Age parsed but lies outside every bucket
    UnresolvedAge { row_id: i64, role: Role, raw: String },
}

/// Talks skipped during a run
#[derive(Debug, Clone, Default)]
pub struct SkipList {
    entries: Vec<String>,
}

impl SkipList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped talk (duplicates allowed)
    pub fn record(&mut self, talk_id: &str) {
        self.entries.push(talk_id.to_string());
    }

    /// Number of recorded skips, counting repeats
    pub fn recorded(&self) -> usize {
        self.entries.len()
    }

    /// Distinct talk IDs in first-seen order
    pub fn distinct(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Summary of one job run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub job: String,
    pub table: String,
    pub started_at: DateTime<Utc>,
    pub rows_fetched: usize,
    pub rows_updated: usize,
    pub rows_inserted: usize,
    pub duplicates_skipped: usize,
    pub warnings: Vec<ResolutionWarning>,
    pub skipped_talks: Vec<String>,
    pub skipped_talk_count: usize,
}

impl RunReport {
    pub fn new(job: &str, table: &str) -> Self {
        Self {
            job: job.to_string(),
            table: table.to_string(),
            started_at: Utc::now(),
            rows_fetched: 0,
            rows_updated: 0,
            rows_inserted: 0,
            duplicates_skipped: 0,
            warnings: Vec::new(),
            skipped_talks: Vec::new(),
            skipped_talk_count: 0,
        }
    }

    /// Record a recoverable condition
    pub fn warn(&mut self, warning: ResolutionWarning) {
        self.warnings.push(warning);
    }

    /// Fold the run's skip-list into the report
    pub fn finish(mut self, skips: &SkipList) -> Self {
        self.skipped_talks = skips.distinct();
        self.skipped_talk_count = self.skipped_talks.len();
        self
    }

    /// Emit the end-of-run summary
    pub fn log_summary(&self) {
        info!(
            job = %self.job,
            table = %self.table,
            fetched = self.rows_fetched,
            updated = self.rows_updated,
            inserted = self.rows_inserted,
            duplicates = self.duplicates_skipped,
            "Completed successfully"
        );

        for warning in &self.warnings {
            warn!(?warning, "Recoverable issue");
        }

        if !self.skipped_talks.is_empty() {
            info!(
                "Skipped talks: {} ({})",
                self.skipped_talks.join(", "),
                self.skipped_talk_count
            );
        }
    }
}
