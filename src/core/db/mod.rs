/// Database Module
///
/// This module provides the database layer of the console, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): owns the single database connection
/// - **Query Execution** (`query.rs`): statement primitives and result marshaling
/// - **Schema** (`schema.rs`): the airline tables and bootstrap helpers
///
/// ## Error Handling
///
/// All database operations use `ConsoleError`; store failures surface as `ConsoleError::Sql`.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
