mod commands;
pub mod error;

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use commands::serve::ServeOptions;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(author, version, about = "Todo list server", long_about = None)]
pub struct Cli {
    /// Database file path (default: $XDG_DATA_HOME/todolist/todolist.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Host address to bind to
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// External base URL for resource links (default: TODOLIST_BASE_URL env or http://<host>:<port>)
        #[arg(long)]
        base_url: Option<String>,
        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
        /// Serve API docs at /docs
        #[arg(long)]
        docs: bool,
    },
    /// Create or upgrade the database schema
    Migrate,
    /// Create an administrator (or promote an existing user)
    CreateAdmin {
        /// Username
        username: String,
        /// Email address (ignored when the user exists)
        #[arg(long)]
        email: String,
        /// Password (ignored when the user exists)
        #[arg(long)]
        password: String,
    },
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            base_url,
            verbose,
            docs,
        } => {
            commands::serve::run(ServeOptions {
                host,
                port,
                db: cli.db,
                base_url,
                verbosity: verbose,
                enable_docs: docs,
            })
            .await?;
        }
        Commands::Migrate => {
            let output = commands::migrate::run(cli.db).await?;
            println!("{}", output);
        }
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => {
            let (db, _) = commands::open_database(cli.db).await?;
            let output = commands::admin::create_admin(&db, &username, &email, &password).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["todolist", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                host,
                port,
                base_url,
                verbose,
                docs,
            } => {
                assert!(host.is_unspecified());
                assert_eq!(port, 3000);
                assert_eq!(base_url, None);
                assert_eq!(verbose, 0);
                assert!(!docs);
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.db, None);
    }

    #[test]
    fn serve_flags() {
        let cli = Cli::try_parse_from([
            "todolist",
            "serve",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
            "--base-url",
            "https://todo.example.com",
            "-vv",
            "--docs",
            "--db",
            "/tmp/t.db",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/t.db")));
        match cli.command {
            Commands::Serve {
                port,
                base_url,
                verbose,
                docs,
                ..
            } => {
                assert_eq!(port, 8080);
                assert_eq!(base_url.as_deref(), Some("https://todo.example.com"));
                assert_eq!(verbose, 2);
                assert!(docs);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn create_admin_requires_credentials() {
        assert!(Cli::try_parse_from(["todolist", "create-admin", "root"]).is_err());
        assert!(
            Cli::try_parse_from([
                "todolist",
                "create-admin",
                "root",
                "--email",
                "root@example.com",
                "--password",
                "pw"
            ])
            .is_ok()
        );
    }
}
