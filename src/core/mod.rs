/// Core Module for the airline console
///
/// This module contains the shared infrastructure the menus are built on:
/// the database connection, the statement executor, the airline schema, and
/// the error taxonomy.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ConsoleError, Result};
