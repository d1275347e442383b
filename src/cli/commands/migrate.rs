//! Migrate command - create or upgrade the schema without serving

use std::path::PathBuf;

use super::open_database;
use crate::cli::error::CliResult;

pub async fn run(db: Option<PathBuf>) -> CliResult<String> {
    let (_, db_path) = open_database(db).await?;
    Ok(format!("Database at {} is up to date", db_path.display()))
}
