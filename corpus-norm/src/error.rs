//! Error types for corpus-norm
//!
//! Every variant here is fatal for a run. Recoverable conditions are not
//! errors; they are collected as [`crate::report::ResolutionWarning`]s.

use thiserror::Error;

/// Fatal job error
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, configuration or I/O failure from the common layer
    #[error(transparent)]
    Common(#[from] corpus_common::Error),

    /// Query failure against the row store
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Expected table returned no rows
    #[error("No rows were retrieved from '{table}'. Does the table exist?")]
    EmptyTable { table: String },

    /// Occupation label absent from the reference table
    #[error("Row {row_id} did not have a discoverable occupation ({label})")]
    UnmappedOccupation { row_id: i64, label: String },

    /// Clause identifier without a known channel marker
    #[error("Row {row_id} has unrecognized channel marker in clause '{clause_id}'")]
    UnrecognizedChannel { row_id: i64, clause_id: String },

    /// Clause whose talk has no interviewer/interviewee record
    #[error("Could not find dialogue for talk {talk_id} (row {row_id})")]
    MissingDialogue { row_id: i64, talk_id: String },
}

/// Result type for corpus-norm jobs
pub type Result<T> = std::result::Result<T, Error>;
