//! HTTP API.
//!
//! - `routes`: router assembly and OpenAPI document
//! - `v1`: handlers
//! - `views`: JSON projections of the entities
//! - `urls`: resource locators embedded in the projections
//! - `extract`: bearer-token extractors

mod extract;
pub mod routes;
mod state;
pub mod urls;
mod v1;
pub mod views;


use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

pub use extract::{AdminUser, BearerToken, CurrentUser};
pub use state::AppState;
pub use urls::UrlBuilder;

/// Env var overriding the external base URL used in resource links.
pub const BASE_URL_ENV: &str = "TODOLIST_BASE_URL";

/// API server errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(code(todolist::api::bind))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(todolist::api::serve))]
    Serve(#[source] std::io::Error),
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// External base URL for resource links (None = derived from host/port)
    pub base_url: Option<String>,
    /// Log verbosity (number of -v flags)
    pub verbosity: u8,
    /// Serve the Scalar UI at /docs
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            base_url: None,
            verbosity: 0,
            enable_docs: false,
        }
    }
}

impl Config {
    /// Default configuration with the base URL taken from
    /// `TODOLIST_BASE_URL` when set.
    pub fn new() -> Self {
        Self {
            base_url: env::var(BASE_URL_ENV).ok().filter(|url| !url.is_empty()),
            ..Self::default()
        }
    }

    /// Override the base URL (CLI flag beats env var).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL clients should use to reach this server.
    pub fn external_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.clone();
        }

        let host = if self.host.is_unspecified() {
            "localhost".to_string()
        } else {
            match self.host {
                IpAddr::V4(v4) => v4.to_string(),
                IpAddr::V6(v6) => format!("[{v6}]"),
            }
        };
        format!("http://{}:{}", host, self.port)
    }
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "todolist=info,tower_http=info",
        1 => "todolist=debug,tower_http=debug",
        _ => "todolist=trace,tower_http=trace,sqlx=debug",
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing(verbosity: u8) {
    // A second initialisation (e.g. in-process tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity))),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the API server with the given configuration
pub async fn run<D: Database>(config: Config, db: D) -> Result<(), ApiError> {
    init_tracing(config.verbosity);

    let urls = UrlBuilder::new(config.external_url());
    let state = AppState::new(db, urls);
    let app = routes::create_router(state, config.enable_docs).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);
    info!("Resource links use {}", config.external_url());
    if config.enable_docs {
        info!("API docs at http://{}/docs", addr);
    }

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
