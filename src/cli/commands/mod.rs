pub mod admin;
pub mod migrate;
pub mod serve;



use std::path::{Path, PathBuf};

use crate::cli::error::{CliError, CliResult};
use crate::db::{Database, SqliteDatabase};
use crate::paths::get_db_path;

/// Resolve the database path (`--db` or the XDG default), open it and bring
/// the schema up to date.
pub async fn open_database(db: Option<PathBuf>) -> CliResult<(SqliteDatabase, PathBuf)> {
    let db_path = db.unwrap_or_else(get_db_path);
    ensure_parent_dir(&db_path)?;

    let db = SqliteDatabase::open(&db_path).await?;
    db.migrate().await?;
    Ok((db, db_path))
}

fn ensure_parent_dir(db_path: &Path) -> CliResult<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| CliError::DataDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
