/// Airline Console Error Module
///
/// This module defines the error taxonomy for the console. Only connection
/// and configuration failures are fatal; everything else is caught at the
/// operation boundary, reported, and the menu loop continues.
use thiserror::Error;

use crate::auth::Role;

/// Error type for the airline console.
///
/// This enum covers every failure the console can hit:
/// - Opening the database at startup (fatal)
/// - Input that does not match an expected domain (recovered by re-prompting)
/// - Statement failures reported by the store
/// - Menu choices that are not numbers, or not permitted for the session role
/// - Configuration loading and console I/O
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The database could not be opened or did not answer the liveness probe
    #[error("Unable to connect to database: {0}")]
    Connect(String),

    /// Input outside its expected domain, e.g. an unknown role name
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Any failure reported by the store while running a statement
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// A menu choice that is not a number
    #[error("Your input is invalid! ({0})")]
    InputParse(String),

    /// The session role is not bound to the requested operation
    #[error("You are not authorized to use option {choice} as {role}.")]
    Authorization { role: Role, choice: u32 },

    /// The input source reached end of file
    #[error("Input stream closed")]
    InputClosed,

    /// Console I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsoleError {
    /// Returns true for errors that must end the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConsoleError::Connect(_) | ConsoleError::Config(_))
    }
}

/// Type alias for Result to use ConsoleError as the error type.
pub type Result<T> = std::result::Result<T, ConsoleError>;
