//! Serve command - starts the REST API

use std::net::IpAddr;
use std::path::PathBuf;

use super::open_database;
use crate::api::{self, Config};
use crate::cli::error::CliResult;

/// Options for the API server
#[derive(Debug)]
pub struct ServeOptions {
    pub host: IpAddr,
    pub port: u16,
    pub db: Option<PathBuf>,
    pub base_url: Option<String>,
    pub verbosity: u8,
    pub enable_docs: bool,
}

/// Run the API server
pub async fn run(options: ServeOptions) -> CliResult<()> {
    let (db, db_path) = open_database(options.db).await?;

    let mut config = Config::new();
    config.host = options.host;
    config.port = options.port;
    config.verbosity = options.verbosity;
    config.enable_docs = options.enable_docs;
    if let Some(base_url) = options.base_url {
        config = config.with_base_url(base_url);
    }

    // Printed before logging is initialised
    println!();
    println!("todolist API server starting...");
    println!("   API:      http://{}:{}/api/", options.host, options.port);
    if options.enable_docs {
        println!("   Docs:     http://{}:{}/docs", options.host, options.port);
    }
    println!("   Links:    {}", config.external_url());
    println!("   Database: {}", db_path.display());
    println!();

    api::run(config, db).await?;
    Ok(())
}
