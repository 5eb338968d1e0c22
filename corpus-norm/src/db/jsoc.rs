//! Occupation reference table

use super::{integer_columns, text_columns};
use crate::error::Result;
use crate::occupation::{OccupationCode, OccupationEntry};
use corpus_common::db::quote_ident;
use sqlx::SqlitePool;

/// Load every reference row in table order
///
/// Labels and categories are read as text and the assigned number as an
/// integer, whatever their declared type.
pub async fn fetch_entries(pool: &SqlitePool, table: &str) -> Result<Vec<OccupationEntry>> {
    let sql = format!(
        r#"
        SELECT {}, {}
        FROM {}
        ORDER BY rowid
        "#,
        text_columns(&["Role", "MajorCategory", "MinorCategory"]),
        integer_columns(&["AssignedNumber"]),
        quote_ident(table)
    );

    let rows: Vec<(String, String, String, i64)> = sqlx::query_as(&sql).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(role, major, minor, number)| OccupationEntry {
            role,
            code: OccupationCode {
                major,
                minor,
                number,
            },
        })
        .collect())
}
