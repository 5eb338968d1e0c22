//! Row store connection and schema bootstrap

pub mod init;

pub use init::*;

use crate::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Connect to an existing corpus database (read-write)
///
/// A missing file is a connectivity failure: the jobs never create the
/// corpus tables implicitly.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Connection(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=rw", db_path.display());

    // Jobs run strictly sequentially, one connection is enough
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .map_err(|e| Error::Connection(format!("{} ({})", e, db_path.display())))?;

    info!("Connected to database: {}", db_path.display());

    Ok(pool)
}

/// Open a database, creating the file and parent directory if needed
pub async fn connect_or_create(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let newly_created = !db_path.exists();
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .map_err(|e| Error::Connection(format!("{} ({})", e, db_path.display())))?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Quote a configured table name for interpolation into SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
