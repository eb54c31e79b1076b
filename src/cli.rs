//! Command line entry point: argument parsing, logging setup, and the
//! connect / dispatch / disconnect sequence.

use crate::authz::AuthorizationTable;
use crate::config::resolve_config;
use crate::console::Console;
use crate::core::db::{ConnectionHandle, Credentials, Endpoint};
use crate::core::Result;
use crate::menu::Dispatcher;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Role-gated console for the airline operations database
#[derive(Parser, Debug)]
#[command(name = "airline-console")]
#[command(about = "Interactive console for the airline operations database", long_about = None)]
pub struct Cli {
    /// Database name (path of the SQLite database file)
    pub dbname: String,

    /// Database port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Configuration file (TOML)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `level`. Safe to call more than once.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Connects, runs the menus on stdin/stdout, and disconnects.
///
/// A failed connection is returned as `ConsoleError::Connect` before any menu
/// is shown.
pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    init_logging(&config.logging.level);
    info!("Starting airline console...");

    let endpoint = Endpoint::new(config.database.host.clone(), cli.port, cli.dbname);
    let credentials = Credentials::new(cli.user, config.database.password.clone());

    let mut stdout = std::io::stdout();
    writeln!(stdout, "Connecting to database...")?;
    writeln!(stdout, "Connection URL: {}\n", endpoint.url())?;
    let mut handle = ConnectionHandle::open(endpoint, credentials, &config.database.connect_options())?;
    writeln!(stdout, "Done")?;

    let outcome = match handle.connection() {
        Ok(connection) => {
            let mut dispatcher = Dispatcher::new(connection, Console::stdio(), AuthorizationTable::standard());
            dispatcher.run()
        }
        Err(e) => Err(e),
    };

    write!(stdout, "Disconnecting from database...")?;
    handle.close();
    writeln!(stdout, "Done\n\nBye !")?;
    outcome
}
