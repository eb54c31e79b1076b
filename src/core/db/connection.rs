/// Connection Management Module
///
/// This module owns the single physical database connection used by the
/// console. The handle is opened once at startup and closed on drop or on an
/// explicit `close()`.

use crate::core::db::schema;
use crate::core::{ConsoleError, Result};
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Database name; for SQLite this is the database file path
    pub database: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Endpoint {
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Connection URL shown to the user while connecting
    pub fn url(&self) -> String {
        format!("sqlite://{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Login used for the database itself (not an airline user account).
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings applied when the connection is opened
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOptions {
    /// Create the database file and the airline tables when missing
    pub bootstrap_schema: bool,
    pub foreign_keys: bool,
    pub busy_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            bootstrap_schema: false,
            foreign_keys: true,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Owner of the one live database connection.
#[derive(Debug)]
pub struct ConnectionHandle {
    endpoint: Endpoint,
    credentials: Credentials,
    /// Active connection (None once closed)
    connection: Option<Connection>,
}

impl ConnectionHandle {
    /// Opens the database described by `endpoint`.
    ///
    /// Fails with `ConsoleError::Connect` when the file cannot be opened, is
    /// not a database, or does not answer a catalog probe. Without
    /// `bootstrap_schema` a missing file is an error rather than being created.
    pub fn open(endpoint: Endpoint, credentials: Credentials, options: &ConnectOptions) -> Result<Self> {
        debug!(url = %endpoint.url(), user = %credentials.user, "opening database");

        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if options.bootstrap_schema {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let conn = Connection::open_with_flags(&endpoint.database, flags)
            .map_err(|e| ConsoleError::Connect(format!("{}: {}", endpoint.database, e)))?;

        conn.busy_timeout(options.busy_timeout)
            .map_err(|e| ConsoleError::Connect(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", options.foreign_keys)
            .map_err(|e| ConsoleError::Connect(e.to_string()))?;

        // Touches the file header, so a non-database file fails here
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(|e| ConsoleError::Connect(format!("{}: {}", endpoint.database, e)))?;

        if options.bootstrap_schema {
            schema::ensure_schema(&conn)
                .map_err(|e| ConsoleError::Connect(format!("schema bootstrap failed: {}", e)))?;
        }

        info!(url = %endpoint.url(), "connected");
        Ok(ConnectionHandle {
            endpoint,
            credentials,
            connection: Some(conn),
        })
    }

    /// Wraps an already open connection, mainly for tests and embedding.
    pub fn from_connection(endpoint: Endpoint, credentials: Credentials, connection: Connection) -> Self {
        ConnectionHandle {
            endpoint,
            credentials,
            connection: Some(connection),
        }
    }

    /// Returns the live connection, or an error once the handle is closed.
    pub fn connection(&self) -> Result<&Connection> {
        self.connection
            .as_ref()
            .ok_or_else(|| ConsoleError::Connect("database connection is closed".to_string()))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn user(&self) -> &str {
        &self.credentials.user
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Closes the connection. Safe to call any number of times; failures are
    /// logged and otherwise ignored.
    pub fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            match conn.close() {
                Ok(()) => debug!(url = %self.endpoint.url(), "connection closed"),
                Err((_conn, e)) => warn!("error while closing connection: {}", e),
            }
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.close();
    }
}
