//! todolist binary.
//!
//! All subcommands live in the library's `cli` module; the concrete SQLite
//! store is opened there and handed to the storage-agnostic API layer.

use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todolist::cli::run().await
}
