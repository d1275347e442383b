//! Path resolution for todolist data.
//!
//! Follows the XDG base directory layout.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "todolist";
const DB_FILE: &str = "todolist.db";

/// Get XDG-compliant data directory.
///
/// `$XDG_DATA_HOME/todolist`, falling back to `~/.local/share/todolist`.
/// Without either variable the directory is relative to the working
/// directory.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_default();

    data_home.join(APP_DIR)
}

/// Get database file path (data_dir/todolist.db).
pub fn get_db_path() -> PathBuf {
    get_data_dir().join(DB_FILE)
}
