//! Row store accessors for corpus-norm
//!
//! One module per corpus. Table names come from configuration; column names
//! are fixed by the corpus exports.
//!
//! Imported tables carry whatever column affinity the import tool gave them
//! (often none, or TEXT everywhere), so every read casts to the type it
//! decodes into.

pub mod csj;
pub mod cwpc;
pub mod jsoc;

use crate::error::{Error, Result};

/// `CAST(col AS TEXT) AS col` for each column, comma-separated
pub(crate) fn text_columns(columns: &[&str]) -> String {
    cast_columns(columns, "TEXT")
}

/// `CAST(col AS INTEGER) AS col` for each column, comma-separated
pub(crate) fn integer_columns(columns: &[&str]) -> String {
    cast_columns(columns, "INTEGER")
}

fn cast_columns(columns: &[&str], sql_type: &str) -> String {
    columns
        .iter()
        .map(|column| format!("CAST({0} AS {1}) AS {0}", column, sql_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reject an empty working set
///
/// An empty source table means a wrong table name or a missing import, not
/// an empty batch.
pub fn require_rows<T>(rows: Vec<T>, table: &str) -> Result<Vec<T>> {
    if rows.is_empty() {
        return Err(Error::EmptyTable {
            table: table.to_string(),
        });
    }
    Ok(rows)
}

/// Column update that may leave the stored value alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWrite<'a> {
    /// Keep the current column value
    Keep,
    /// Overwrite the column (`None` writes NULL)
    Set(Option<&'a str>),
}

impl<'a> FieldWrite<'a> {
    /// `(overwrite flag, value)` bind pair for a `CASE WHEN ? THEN ? ELSE col END` update
    pub(crate) fn bind_pair(self) -> (bool, Option<&'a str>) {
        match self {
            FieldWrite::Keep => (false, None),
            FieldWrite::Set(value) => (true, value),
        }
    }
}
