use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::api::ApiError;
use crate::db::{DbError, ValidationError};

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todolist::cli::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory {path}")]
    #[diagnostic(
        code(todolist::cli::io),
        help("Pass --db with a writable location or set XDG_DATA_HOME.")
    )]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    #[diagnostic(code(todolist::cli::invalid_input))]
    Validation(#[from] ValidationError),

    #[error("{entity_type} could not be saved: {reason}")]
    #[diagnostic(
        code(todolist::cli::rejected),
        help("Usernames and email addresses must be unique.")
    )]
    Rejected { entity_type: String, reason: String },

    #[error("API server error: {0}")]
    #[diagnostic(code(todolist::cli::api))]
    Api(#[from] ApiError),
}

pub type CliResult<T> = Result<T, CliError>;
